//! Semicolon-delimited CSV export, the format the spreadsheet users expect.

use std::borrow::Cow;

use sea_orm::ActiveEnum;

use crate::db::entity::slots;
use crate::raffle::storage::PaymentDetail;

const SEPARATOR: char = ';';

fn escape(field: &str) -> Cow<'_, str> {
    if field.contains([SEPARATOR, '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn line<I, S>(fields: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fields
        .into_iter()
        .map(|field| escape(field.as_ref()).into_owned())
        .collect::<Vec<_>>()
        .join(&SEPARATOR.to_string())
}

/// Renders a header row plus one row per record, rows separated by `\n`.
pub fn render<H, S>(header: H, rows: Vec<Vec<String>>) -> String
where
    H: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = line(header);
    for row in rows {
        out.push('\n');
        out.push_str(&line(row));
    }
    out.push('\n');
    out
}

pub fn slots_csv(slots: &[slots::Model]) -> String {
    let rows = slots
        .iter()
        .map(|slot| {
            vec![
                slot.numero.clone(),
                slot.status.to_value(),
                slot.apelido.clone().unwrap_or_default(),
                slot.data_reserva
                    .map(|at| at.to_rfc3339())
                    .unwrap_or_default(),
                slot.data_venda
                    .map(|at| at.to_rfc3339())
                    .unwrap_or_default(),
            ]
        })
        .collect();
    render(["Numero", "Status", "Apelido", "Reservado em", "Vendido em"], rows)
}

pub fn payments_csv(payments: &[PaymentDetail]) -> String {
    let rows = payments
        .iter()
        .map(|detail| {
            vec![
                detail.payment.numero.clone(),
                detail.payment.apelido.clone(),
                detail.bettor_name.clone(),
                format!("{:.2}", detail.payment.valor),
                detail.payment.metodo.clone(),
                detail.payment.status.to_value(),
                detail.payment.data_registro.to_rfc3339(),
            ]
        })
        .collect();
    render(
        ["Numero", "Apelido", "Nome", "Valor", "Metodo", "Status", "Data"],
        rows,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::db::entity::sea_orm_active_enums::SlotStatus;

    #[test]
    fn fields_with_separator_are_quoted() {
        assert_eq!(line(["a;b", "plain"]), "\"a;b\";plain");
    }

    #[test]
    fn quotes_inside_fields_are_doubled() {
        assert_eq!(line(["say \"hi\";now"]), "\"say \"\"hi\"\";now\"");
    }

    #[test]
    fn slot_rows_carry_owner_and_timestamps() {
        let reserved_at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let csv = slots_csv(&[slots::Model {
            id: 1,
            evento_id: 7,
            numero: "042".into(),
            status: SlotStatus::Reserved,
            apelido: Some("joao".into()),
            data_reserva: Some(reserved_at),
            data_venda: None,
        }]);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("Numero;Status;Apelido;Reservado em;Vendido em")
        );
        assert_eq!(
            lines.next(),
            Some("042;RESERVADO;joao;2024-03-01T12:00:00+00:00;")
        );
    }
}
