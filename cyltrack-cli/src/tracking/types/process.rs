//! Process types recorded in the PROCESO sheet and their direction

use serde::Serialize;

/// Which way a movement takes a unit relative to the plant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    /// Unit leaves for a client (DESPACHO, ENTREGA)
    Outbound,
    /// Unit comes back (RETIRO, RECEPCION)
    Inbound,
}

/// Movement process type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ProcessType {
    Despacho,
    Entrega,
    Retiro,
    Recepcion,
    /// Any other label found in the sheet, kept verbatim (trimmed, uppercased)
    Other(String),
}

impl ProcessType {
    /// Parse a sheet label. Returns None for blank cells.
    pub fn parse(raw: &str) -> Option<Self> {
        let label = raw.trim().to_uppercase();
        if label.is_empty() {
            return None;
        }

        Some(match label.as_str() {
            "DESPACHO" => ProcessType::Despacho,
            "ENTREGA" => ProcessType::Entrega,
            "RETIRO" => ProcessType::Retiro,
            "RECEPCION" | "RECEPCIÓN" => ProcessType::Recepcion,
            _ => ProcessType::Other(label),
        })
    }

    /// Direction of this process, None for unrecognised labels
    pub fn direction(&self) -> Option<Direction> {
        match self {
            ProcessType::Despacho | ProcessType::Entrega => Some(Direction::Outbound),
            ProcessType::Retiro | ProcessType::Recepcion => Some(Direction::Inbound),
            ProcessType::Other(_) => None,
        }
    }

    pub fn is_outbound(&self) -> bool {
        self.direction() == Some(Direction::Outbound)
    }

    pub fn is_inbound(&self) -> bool {
        self.direction() == Some(Direction::Inbound)
    }

    /// Label as written in the sheet
    pub fn label(&self) -> &str {
        match self {
            ProcessType::Despacho => "DESPACHO",
            ProcessType::Entrega => "ENTREGA",
            ProcessType::Retiro => "RETIRO",
            ProcessType::Recepcion => "RECEPCION",
            ProcessType::Other(label) => label,
        }
    }
}

impl std::fmt::Display for ProcessType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_labels() {
        assert_eq!(ProcessType::parse("DESPACHO"), Some(ProcessType::Despacho));
        assert_eq!(ProcessType::parse(" entrega "), Some(ProcessType::Entrega));
        assert_eq!(ProcessType::parse("Retiro"), Some(ProcessType::Retiro));
        assert_eq!(ProcessType::parse("RECEPCIÓN"), Some(ProcessType::Recepcion));
        assert_eq!(ProcessType::parse("   "), None);
    }

    #[test]
    fn test_unknown_label_is_kept() {
        let process = ProcessType::parse("traslado").unwrap();
        assert_eq!(process, ProcessType::Other("TRASLADO".to_string()));
        assert_eq!(process.label(), "TRASLADO");
        assert_eq!(process.direction(), None);
    }

    #[test]
    fn test_direction_partition() {
        assert!(ProcessType::Despacho.is_outbound());
        assert!(ProcessType::Entrega.is_outbound());
        assert!(ProcessType::Retiro.is_inbound());
        assert!(ProcessType::Recepcion.is_inbound());
        assert!(!ProcessType::Despacho.is_inbound());
        assert!(!ProcessType::Recepcion.is_outbound());
    }
}
