use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::RecordStatus;

/// Standing (bettor, number) pairing applied to event pools on demand.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fixos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub apelido: String,
    pub numero: String,
    pub grupo: Option<String>,
    pub status: RecordStatus,
    pub data_registro: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
