use medrec_core::Patient;
use time::Date;

/// Row shape of the `patients` table.
#[derive(Debug, sqlx::FromRow)]
pub struct PatientRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub birthday: Date,
    pub description: String,
    pub primary_doctor: String,
    pub image_identifier: Option<String>,
}

impl From<PatientRow> for Patient {
    fn from(row: PatientRow) -> Self {
        Patient {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            birthday: row.birthday,
            description: row.description,
            primary_doctor: row.primary_doctor,
            image_identifier: row.image_identifier,
        }
    }
}
