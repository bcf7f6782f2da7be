use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::EventStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "eventos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "Nome")]
    pub name: String,
    #[sea_orm(column_name = "Tipo")]
    pub kind: String,
    #[sea_orm(column_name = "Divulgacao")]
    pub announcement_date: Date,
    #[sea_orm(column_name = "Ticket")]
    pub ticket_price: f64,
    #[sea_orm(column_name = "Premio")]
    pub prize: f64,
    #[sea_orm(column_name = "Trave")]
    pub floor_prize: Option<f64>,
    #[sea_orm(column_name = "Resultado")]
    pub result_number: Option<String>,
    #[sea_orm(column_name = "Descricao")]
    pub description: Option<String>,
    #[sea_orm(column_name = "Concurso")]
    pub draw_reference: Option<String>,
    #[sea_orm(column_name = "Status")]
    pub status: EventStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::slots::Entity")]
    Slots,
}

impl Related<super::slots::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Slots.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
