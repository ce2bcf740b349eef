use super::enums::{JoinConnection, JoinType};
use serde::Serialize;

/// A table joined to a layer's features.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Join {
    pub name: Option<String>,
    pub table: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub header: Option<String>,
    pub template: Option<String>,
    pub footer: Option<String>,
    pub connection: Option<String>,
    pub connection_type: JoinConnection,
    pub join_type: JoinType,
}

impl Default for Join {
    fn default() -> Self {
        Self {
            name: None,
            table: None,
            from: None,
            to: None,
            header: None,
            template: None,
            footer: None,
            connection: None,
            connection_type: JoinConnection::Xbase,
            join_type: JoinType::OneToOne,
        }
    }
}
