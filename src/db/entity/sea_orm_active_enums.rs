use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle of one pool slot. `Sold` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum SlotStatus {
    #[sea_orm(string_value = "DISPONIVEL")]
    Available,
    #[sea_orm(string_value = "RESERVADO")]
    Reserved,
    #[sea_orm(string_value = "VENDIDO")]
    Sold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum EventStatus {
    #[sea_orm(string_value = "Ativo")]
    Active,
    #[sea_orm(string_value = "Cancelado")]
    Cancelled,
    #[sea_orm(string_value = "Encerrado")]
    Completed,
}

/// Active/inactive flag shared by bettors and fixed assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum RecordStatus {
    #[sea_orm(string_value = "Ativo")]
    Active,
    #[sea_orm(string_value = "Inativo")]
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "Pendente")]
    Pending,
    #[sea_orm(string_value = "Confirmado")]
    Confirmed,
    #[sea_orm(string_value = "Cancelado")]
    Cancelled,
}
