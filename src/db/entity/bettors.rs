use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::RecordStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "apostadores")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "Nome")]
    pub full_name: String,
    #[sea_orm(column_name = "Apelido", unique)]
    pub nickname: String,
    #[sea_orm(column_name = "DDD")]
    pub area_code: Option<String>,
    #[sea_orm(column_name = "Telefone")]
    pub phone: Option<String>,
    #[sea_orm(column_name = "Email")]
    pub email: Option<String>,
    #[sea_orm(column_name = "Endereco")]
    pub address: Option<String>,
    #[sea_orm(column_name = "Status")]
    pub status: RecordStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
