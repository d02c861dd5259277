//! Joins between DETALLE and PROCESO on the movement id

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};

use super::dataset::Dataset;
use super::types::{Movement, MovementId, Serial, UnitDetail};

/// One unit taking part in one movement (a row of the unified view)
#[derive(Debug, Clone, Copy)]
pub struct UnitMovement<'a> {
    pub serial: &'a Serial,
    pub detail: &'a UnitDetail,
    /// None when the detail's id matches no PROCESO row
    pub movement: Option<&'a Movement>,
}

impl<'a> UnitMovement<'a> {
    pub fn date(&self) -> Option<NaiveDate> {
        self.movement.and_then(|m| m.date)
    }

    pub fn time(&self) -> Option<NaiveTime> {
        self.movement.and_then(|m| m.time)
    }

    pub fn is_outbound(&self) -> bool {
        self.movement.is_some_and(|m| m.is_outbound())
    }

    pub fn is_inbound(&self) -> bool {
        self.movement.is_some_and(|m| m.is_inbound())
    }

    /// Movement id, taken from the detail so orphans still show it
    pub fn movement_id(&self) -> &'a str {
        self.detail
            .movement_id
            .as_ref()
            .map(|id| id.as_str())
            .unwrap_or("")
    }

    pub fn process(&self) -> &'a str {
        self.movement.map(|m| m.process_label()).unwrap_or("")
    }

    pub fn client(&self) -> Option<&'a str> {
        self.movement.and_then(|m| m.client.as_deref())
    }

    pub fn location(&self) -> Option<&'a str> {
        self.movement.and_then(|m| m.location.as_deref())
    }

    /// Service of the movement, falling back to the one on the detail row
    pub fn service(&self) -> Option<&'a str> {
        self.movement
            .and_then(|m| m.service.as_deref())
            .or(self.detail.service.as_deref())
    }
}

/// Index of movements by id, in source order
fn movements_by_id(movements: &[Movement]) -> HashMap<&MovementId, Vec<&Movement>> {
    let mut index: HashMap<&MovementId, Vec<&Movement>> = HashMap::new();
    for movement in movements {
        if let Some(id) = movement.id.as_ref() {
            index.entry(id).or_default().push(movement);
        }
    }
    index
}

/// Left join DETALLE → PROCESO
///
/// Rows come out in DETALLE order, then PROCESO order for duplicate ids.
/// Details without a serial cannot identify a unit and are left out.
pub fn unit_movements(dataset: &Dataset) -> Vec<UnitMovement<'_>> {
    let index = movements_by_id(&dataset.movements);
    let mut view = Vec::with_capacity(dataset.details.len());

    for detail in &dataset.details {
        let Some(serial) = detail.serial.as_ref() else {
            continue;
        };

        let matches = detail.movement_id.as_ref().and_then(|id| index.get(id));
        match matches {
            Some(movements) => {
                for movement in movements {
                    view.push(UnitMovement {
                        serial,
                        detail,
                        movement: Some(*movement),
                    });
                }
            }
            None => view.push(UnitMovement {
                serial,
                detail,
                movement: None,
            }),
        }
    }

    log::debug!(
        "Joined {} details into {} unit movements",
        dataset.details.len(),
        view.len()
    );
    view
}

/// Details grouped by movement id, in DETALLE order
pub fn details_by_movement(details: &[UnitDetail]) -> HashMap<&MovementId, Vec<&UnitDetail>> {
    let mut index: HashMap<&MovementId, Vec<&UnitDetail>> = HashMap::new();
    for detail in details {
        if let Some(id) = detail.movement_id.as_ref() {
            index.entry(id).or_default().push(detail);
        }
    }
    index
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{NaiveDate, NaiveTime};

    use super::super::types::{Movement, MovementId, ProcessType, Serial, UnitDetail};

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    pub fn make_movement(
        row: usize,
        id: &str,
        date: Option<NaiveDate>,
        process: &str,
        client: &str,
    ) -> Movement {
        Movement {
            row,
            id: MovementId::parse(id),
            date,
            time: None,
            process: ProcessType::parse(process),
            client: Some(client.to_string()).filter(|c| !c.is_empty()),
            location: None,
            service: None,
        }
    }

    pub fn make_detail(row: usize, id: &str, serial: &str) -> UnitDetail {
        UnitDetail {
            row,
            movement_id: MovementId::parse(id),
            serial: Serial::parse(serial),
            service: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_left_join_keeps_orphans_and_drops_blank_serials() {
        let dataset = Dataset::from_records(
            vec![
                make_movement(0, "1", Some(date(2024, 1, 1)), "DESPACHO", "ACME"),
                make_movement(1, "2", Some(date(2024, 1, 9)), "RETIRO", "ACME"),
            ],
            vec![
                make_detail(0, "1", "1,000"),
                make_detail(1, "2", "1000"),
                make_detail(2, "77", "2000"),
                make_detail(3, "1", ""),
            ],
        );

        let view = unit_movements(&dataset);
        assert_eq!(view.len(), 3);
        assert_eq!(view[0].serial.as_str(), "1000");
        assert_eq!(view[0].process(), "DESPACHO");
        assert_eq!(view[1].movement_id(), "2");
        assert!(view[2].movement.is_none());
        assert_eq!(view[2].movement_id(), "77");
        assert_eq!(view[2].date(), None);
    }

    #[test]
    fn test_duplicate_movement_ids_fan_out() {
        let dataset = Dataset::from_records(
            vec![
                make_movement(0, "5", Some(date(2024, 1, 1)), "DESPACHO", "A"),
                make_movement(1, "5", Some(date(2024, 1, 2)), "ENTREGA", "B"),
            ],
            vec![make_detail(0, "5", "9")],
        );

        let view = unit_movements(&dataset);
        assert_eq!(view.len(), 2);
        assert_eq!(view[0].client(), Some("A"));
        assert_eq!(view[1].client(), Some("B"));
    }

    #[test]
    fn test_service_falls_back_to_detail() {
        let mut detail = make_detail(0, "1", "9");
        detail.service = Some("MANTENCION".to_string());
        let dataset = Dataset::from_records(
            vec![make_movement(0, "1", Some(date(2024, 1, 1)), "DESPACHO", "A")],
            vec![detail],
        );

        let view = unit_movements(&dataset);
        assert_eq!(view[0].service(), Some("MANTENCION"));
    }
}
