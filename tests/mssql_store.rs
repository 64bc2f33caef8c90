//! Runs against a live SQL Server when `MEDAPP_TEST_MSSQL` holds a connection
//! string; otherwise every test returns early.

#[cfg(test)]
mod tests {
    use chrono::{Duration, Local, Timelike};
    use medapp::db::{mssql::MssqlStore, ClinicStore, DeleteOutcome, DeletePolicy};
    use medapp::libs::appointment::AppointmentForm;
    use medapp::libs::doctor::DoctorForm;
    use medapp::libs::patient::PatientForm;
    use test_context::{test_context, TestContext};

    const CONNECTION_ENV: &str = "MEDAPP_TEST_MSSQL";

    struct MssqlTestContext {
        store: Option<MssqlStore>,
    }

    impl TestContext for MssqlTestContext {
        fn setup() -> Self {
            let store = std::env::var(CONNECTION_ENV)
                .ok()
                .map(|connection_string| MssqlStore::open(&connection_string).unwrap());
            MssqlTestContext { store }
        }
    }

    #[test_context(MssqlTestContext)]
    #[test]
    fn test_seed_and_default_policy(ctx: &mut MssqlTestContext) {
        let Some(store) = ctx.store.as_mut() else { return };

        assert_eq!(store.delete_policy(), DeletePolicy::Block);
        assert!(store.doctors().unwrap().len() >= 5);
        assert!(!store.patients().unwrap().is_empty());
    }

    #[test_context(MssqlTestContext)]
    #[test]
    fn test_booking_round_trip(ctx: &mut MssqlTestContext) {
        let Some(store) = ctx.store.as_mut() else { return };

        let doctor_id = store.add_doctor(&DoctorForm::new("Dr. Test Booking", "Oncology", true)).unwrap();
        let patient_id = store.add_patient(&PatientForm::new("Test Booking", "booking@example.com")).unwrap();
        let date = (Local::now().naive_local() + Duration::days(1)).with_nanosecond(0).unwrap();

        let id = store.book_appointment(&AppointmentForm::new(doctor_id, patient_id, date, "Smoke test")).unwrap();
        let view = store.appointment(id).unwrap().unwrap();
        assert_eq!(view.doctor_name, "Dr. Test Booking");
        assert_eq!(view.patient_email, "booking@example.com");
        assert_eq!(view.date, date);

        assert_eq!(store.delete_doctor(doctor_id).unwrap(), DeleteOutcome::Blocked { appointments: 1 });
        assert!(store.delete_appointment(id).unwrap());
        assert!(store.delete_doctor(doctor_id).unwrap().succeeded());
        assert!(store.delete_patient(patient_id).unwrap().succeeded());
        assert!(store.doctor(doctor_id).unwrap().is_none());
    }

    #[test_context(MssqlTestContext)]
    #[test]
    fn test_cascading_delete(ctx: &mut MssqlTestContext) {
        let Some(store) = ctx.store.take() else { return };
        let mut store = store.with_delete_policy(DeletePolicy::Cascade);

        let patient_id = store.add_patient(&PatientForm::new("Test Cascade", "cascade@example.com")).unwrap();
        let date = (Local::now().naive_local() + Duration::days(2)).with_nanosecond(0).unwrap();
        store.book_appointment(&AppointmentForm::new(1, patient_id, date, "")).unwrap();
        store.book_appointment(&AppointmentForm::new(2, patient_id, date, "")).unwrap();

        assert_eq!(store.delete_patient(patient_id).unwrap(), DeleteOutcome::Deleted { cascaded: 2 });
        assert!(store.appointments_by_patient(patient_id).unwrap().is_empty());
    }

    #[test_context(MssqlTestContext)]
    #[test]
    fn test_missing_records(ctx: &mut MssqlTestContext) {
        let Some(store) = ctx.store.as_mut() else { return };

        assert!(store.doctor(-1).unwrap().is_none());
        assert!(!store.set_doctor_availability(-1, true).unwrap());
        assert_eq!(store.delete_patient(-1).unwrap(), DeleteOutcome::NotFound);
    }
}
