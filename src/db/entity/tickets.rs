use sea_orm::entity::prelude::*;

/// Physical/digital ticket inventory, independent of events.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bilhetes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub numero: String,
    pub tipo: String,
    pub lote: Option<String>,
    pub status: String,
    pub observacoes: Option<String>,
    pub data_cadastro: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
