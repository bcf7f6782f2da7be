use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::PaymentStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "pagamentos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Payment reference, not a pool number ("FIXO-<event>-<number>" for
    /// placeholder rows created during event initialization).
    pub numero: String,
    pub apelido: String,
    pub valor: f64,
    pub metodo: String,
    pub status: PaymentStatus,
    pub observacoes: Option<String>,
    pub data_registro: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Bettor,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Bettor => Entity::belongs_to(super::bettors::Entity)
                .from(Column::Apelido)
                .to(super::bettors::Column::Nickname)
                .into(),
        }
    }
}

impl Related<super::bettors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bettor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
