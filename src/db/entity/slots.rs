use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::SlotStatus;

/// One three-digit number within one event's pool. The database enforces
/// UNIQUE (evento_id, numero).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "jogos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub evento_id: i64,
    pub numero: String,
    pub status: SlotStatus,
    pub apelido: Option<String>,
    pub data_reserva: Option<DateTimeUtc>,
    pub data_venda: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Event,
    Bettor,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Event => Entity::belongs_to(super::events::Entity)
                .from(Column::EventoId)
                .to(super::events::Column::Id)
                .into(),
            Self::Bettor => Entity::belongs_to(super::bettors::Entity)
                .from(Column::Apelido)
                .to(super::bettors::Column::Nickname)
                .into(),
        }
    }
}

impl Related<super::events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl Related<super::bettors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bettor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
