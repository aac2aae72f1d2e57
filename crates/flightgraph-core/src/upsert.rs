//! Graph upsert engine
//!
//! One transaction per batch. Airports, airlines, aircraft types, days,
//! countries and cities are create-only; flights are overwritten on every
//! import. Edges are merged, so replaying a batch adds nothing, and each
//! flight keeps exactly one edge of each of its five relationship types.

use crate::errors::{ExError, ExResult, FlightGraphError};
use crate::graph::{GraphStore, GraphTxn};
use crate::model::{AirportInfo, FlightRecord, NodeKey, Props, RelType};
use crate::{log_op_error, log_op_progress};
use serde_json::Value;
use std::time::Instant;

/// Write one batch of flight records in a single transaction
///
/// Nothing of the batch is visible if this fails; batches committed before
/// it stay committed.
///
/// # Errors
///
/// `Transaction` carrying the batch number, with the store error as source.
pub fn upsert_batch<S: GraphStore>(
    store: &mut S,
    batch: usize,
    total: usize,
    records: &[FlightRecord],
) -> ExResult<()> {
    let start = Instant::now();

    let result = store
        .begin()
        .and_then(|mut tx| {
            for record in records {
                write_flight(&mut tx, record)?;
            }
            tx.commit()
        })
        .map_err(|cause| transaction_error(batch, cause));

    match result {
        Ok(()) => {
            log_op_progress!(
                "upsert_batch",
                format!("batch {}/{}", batch, total),
                batch = batch,
                total = total,
                records = records.len(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            Ok(())
        }
        Err(err) => {
            log_op_error!(
                "upsert_batch",
                &err,
                duration_ms = start.elapsed().as_millis() as u64,
                batch = batch,
                total = total
            );
            Err(err)
        }
    }
}

pub(crate) fn transaction_error(batch: usize, cause: ExError) -> ExError {
    ExError::from(FlightGraphError::TransactionFailed {
        batch,
        reason: cause.message().to_string(),
    })
    .with_source(cause)
}

fn write_flight<T: GraphTxn>(tx: &mut T, record: &FlightRecord) -> ExResult<()> {
    let adep = NodeKey::airport(&record.adep);
    let ades = NodeKey::airport(&record.ades);
    write_airport(
        tx,
        &adep,
        record.adep_lat,
        record.adep_lon,
        record.adep_info.as_ref(),
    )?;
    write_airport(
        tx,
        &ades,
        record.ades_lat,
        record.ades_lon,
        record.ades_info.as_ref(),
    )?;

    let airline = NodeKey::airline(&record.operator);
    let aircraft = NodeKey::aircraft_type(&record.ac_type);
    let day = NodeKey::day(&record.day_key());
    for key in [&airline, &aircraft, &day] {
        tx.merge_node_create_only(key, &Props::new())?;
    }

    let flight = NodeKey::flight(&record.flight_id);
    tx.merge_node_overwrite(&flight, &flight_props(record))?;

    // A re-imported flight may have changed operator, type, day or route
    tx.merge_single_edge(&flight, RelType::DepartsFrom, &adep)?;
    tx.merge_single_edge(&flight, RelType::ArrivesTo, &ades)?;
    tx.merge_single_edge(&flight, RelType::OperatedBy, &airline)?;
    tx.merge_single_edge(&flight, RelType::Aircraft, &aircraft)?;
    tx.merge_single_edge(&flight, RelType::OnDay, &day)?;
    Ok(())
}

fn write_airport<T: GraphTxn>(
    tx: &mut T,
    key: &NodeKey,
    lat: f64,
    lon: f64,
    info: Option<&AirportInfo>,
) -> ExResult<()> {
    let mut props = Props::new();
    props.insert("lat".to_string(), Value::from(lat));
    props.insert("lon".to_string(), Value::from(lon));
    if let Some(name) = info.and_then(AirportInfo::display_name) {
        props.insert("name".to_string(), Value::from(name));
    }
    tx.merge_node_create_only(key, &props)?;

    // City identity needs both halves; otherwise the endpoint gets no location
    if let Some((city_name, country_name)) = info.and_then(AirportInfo::location) {
        let country = NodeKey::country(country_name);
        let city = NodeKey::city(city_name, country_name);
        tx.merge_node_create_only(&country, &Props::new())?;
        tx.merge_node_create_only(&city, &Props::new())?;
        tx.merge_edge(&city, RelType::InCountry, &country)?;
        tx.merge_edge(key, RelType::InCity, &city)?;
    }
    Ok(())
}

fn flight_props(record: &FlightRecord) -> Props {
    let mut props = Props::new();
    props.insert("offBlockTime".to_string(), Value::from(record.off_block_iso()));
    props.insert("arrivalTime".to_string(), Value::from(record.arrival_iso()));
    props.insert("durationMin".to_string(), Value::from(record.duration_min));
    props.insert("distanceNm".to_string(), Value::from(record.distance_nm));
    props
}
