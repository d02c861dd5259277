//! Movements recorded for one unit

use std::collections::HashSet;

use crate::tracking::dataset::Dataset;
use crate::tracking::types::{Movement, MovementId, Serial};

use super::QueryError;

/// All PROCESO rows the unit took part in, in source order
pub fn movements_for_serial<'a>(
    dataset: &'a Dataset,
    serial_input: &str,
) -> Result<Vec<&'a Movement>, QueryError> {
    let serial = Serial::parse(serial_input).ok_or(QueryError::EmptySerial)?;

    let ids: HashSet<&MovementId> = dataset
        .details
        .iter()
        .filter(|d| d.serial.as_ref() == Some(&serial))
        .filter_map(|d| d.movement_id.as_ref())
        .collect();

    let movements: Vec<&Movement> = dataset
        .movements
        .iter()
        .filter(|m| m.id.as_ref().is_some_and(|id| ids.contains(id)))
        .collect();

    log::debug!(
        "Serial {} appears under {} ids, {} movements",
        serial,
        ids.len(),
        movements.len()
    );
    Ok(movements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::join::fixtures::*;

    #[test]
    fn test_serial_stored_with_separators_is_found() {
        let dataset = Dataset::from_records(
            vec![
                make_movement(0, "1", Some(date(2024, 3, 1)), "DESPACHO", "ACME"),
                make_movement(1, "2", Some(date(2024, 3, 5)), "RETIRO", "ACME"),
                make_movement(2, "3", Some(date(2024, 3, 6)), "DESPACHO", "OTRO"),
            ],
            vec![
                make_detail(0, "1", "000,123"),
                make_detail(1, "2", "000,123"),
                make_detail(2, "3", "000,124"),
            ],
        );

        let found = movements_for_serial(&dataset, "000123").unwrap();
        let ids: Vec<&str> = found.iter().map(|m| m.id_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);

        // User input is normalized the same way
        assert_eq!(movements_for_serial(&dataset, "000,123").unwrap().len(), 2);
    }

    #[test]
    fn test_results_follow_source_order_without_duplicates() {
        let dataset = Dataset::from_records(
            vec![
                make_movement(0, "9", Some(date(2024, 3, 9)), "RETIRO", "A"),
                make_movement(1, "4", Some(date(2024, 3, 1)), "DESPACHO", "A"),
            ],
            vec![
                make_detail(0, "4", "55"),
                make_detail(1, "9", "55"),
                make_detail(2, "9", "55"),
            ],
        );

        let found = movements_for_serial(&dataset, "55").unwrap();
        let ids: Vec<&str> = found.iter().map(|m| m.id_str()).collect();
        assert_eq!(ids, vec!["9", "4"]);
    }

    #[test]
    fn test_unknown_serial_is_empty_and_blank_is_rejected() {
        let dataset = Dataset::from_records(vec![], vec![make_detail(0, "1", "5")]);
        assert!(movements_for_serial(&dataset, "6").unwrap().is_empty());
        assert_eq!(
            movements_for_serial(&dataset, " , ").unwrap_err(),
            QueryError::EmptySerial
        );
    }
}
