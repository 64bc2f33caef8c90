#[cfg(test)]
mod tests {
    use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
    use medapp::db::{self, ClinicStore, DeleteOutcome, DeletePolicy};
    use medapp::libs::appointment::AppointmentForm;
    use medapp::libs::config::{BackendConfig, Config};
    use medapp::libs::data_storage::DataStorage;
    use medapp::libs::doctor::DoctorForm;
    use medapp::libs::patient::PatientForm;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct StoreTestContext {
        temp_dir: TempDir,
    }

    impl TestContext for StoreTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            StoreTestContext { temp_dir }
        }
    }

    impl StoreTestContext {
        /// A freshly seeded store for every local backend, each in its own directory.
        fn stores(&self, delete_policy: Option<DeletePolicy>) -> Vec<Box<dyn ClinicStore>> {
            [BackendConfig::Sqlite { path: None }, BackendConfig::Files { dir: None }]
                .into_iter()
                .map(|backend| {
                    let storage = DataStorage::at(self.temp_dir.path().join(backend.name()));
                    db::open_in(&Config { backend, delete_policy }, &storage).unwrap()
                })
                .collect()
        }
    }

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2030, 3, day).unwrap().and_hms_opt(hour, 0, 0).unwrap()
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_end_to_end_booking(ctx: &mut StoreTestContext) {
        for mut store in ctx.stores(None) {
            let doctor_id = store.add_doctor(&DoctorForm::new("Dr. X", "Oncology", true)).unwrap();
            assert_eq!(doctor_id, 6, "{}", store.backend_name());

            let tomorrow = Local::now().naive_local() + Duration::days(1);
            let appointment_id = store.book_appointment(&AppointmentForm::new(doctor_id, 1, tomorrow, "")).unwrap();
            assert!(appointment_id > 0);

            let views = store.appointments_by_doctor(doctor_id).unwrap();
            assert_eq!(views.len(), 1, "{}", store.backend_name());
            assert_eq!(views[0].id, appointment_id);
            assert_eq!(views[0].patient_id, 1);
            assert_eq!(views[0].doctor_name, "Dr. X");
            assert_eq!(views[0].specialty, "Oncology");
            assert_eq!(views[0].notes, None);
        }
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_ids_are_not_reused_after_deleting_newest(ctx: &mut StoreTestContext) {
        for mut store in ctx.stores(None) {
            let doctor_id = store.add_doctor(&DoctorForm::new("Dr. Temp", "Neurology", true)).unwrap();
            assert!(store.delete_doctor(doctor_id).unwrap().succeeded());
            let next_doctor_id = store.add_doctor(&DoctorForm::new("Dr. Next", "Neurology", true)).unwrap();
            assert!(next_doctor_id > doctor_id, "{}", store.backend_name());

            let patient_id = store.add_patient(&PatientForm::new("Temp Patient", "temp@example.com")).unwrap();
            assert!(store.delete_patient(patient_id).unwrap().succeeded());
            let next_patient_id = store.add_patient(&PatientForm::new("Next Patient", "next@example.com")).unwrap();
            assert!(next_patient_id > patient_id, "{}", store.backend_name());

            let appointment_id = store.book_appointment(&AppointmentForm::new(1, 1, at(1, 9), "first")).unwrap();
            assert!(store.delete_appointment(appointment_id).unwrap());
            let next_appointment_id = store.book_appointment(&AppointmentForm::new(1, 1, at(1, 10), "second")).unwrap();
            assert!(next_appointment_id > appointment_id, "{}", store.backend_name());
        }
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_delete_doctor_without_appointments(ctx: &mut StoreTestContext) {
        for policy in [DeletePolicy::Block, DeletePolicy::Cascade] {
            let dir = ctx.temp_dir.path().join(policy.to_string());
            for backend in [BackendConfig::Sqlite { path: None }, BackendConfig::Files { dir: None }] {
                let storage = DataStorage::at(dir.join(backend.name()));
                let mut store = db::open_in(&Config { backend, delete_policy: Some(policy) }, &storage).unwrap();

                assert_eq!(store.delete_doctor(3).unwrap(), DeleteOutcome::Deleted { cascaded: 0 });
                assert!(store.doctor(3).unwrap().is_none());
            }
        }
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_blocking_delete_keeps_doctor_and_appointments(ctx: &mut StoreTestContext) {
        for mut store in ctx.stores(Some(DeletePolicy::Block)) {
            store.book_appointment(&AppointmentForm::new(1, 2, at(5, 9), "")).unwrap();

            let outcome = store.delete_doctor(1).unwrap();
            assert_eq!(outcome, DeleteOutcome::Blocked { appointments: 1 }, "{}", store.backend_name());
            assert!(!outcome.succeeded());
            assert!(store.doctor(1).unwrap().is_some());
            assert_eq!(store.appointments().unwrap().len(), 1);

            assert_eq!(store.delete_patient(2).unwrap(), DeleteOutcome::Blocked { appointments: 1 });
            assert!(store.patient(2).unwrap().is_some());
        }
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_cascading_delete_removes_dependent_appointments(ctx: &mut StoreTestContext) {
        for mut store in ctx.stores(Some(DeletePolicy::Cascade)) {
            store.book_appointment(&AppointmentForm::new(2, 1, at(5, 9), "")).unwrap();
            store.book_appointment(&AppointmentForm::new(2, 3, at(6, 9), "")).unwrap();
            let kept = store.book_appointment(&AppointmentForm::new(4, 3, at(7, 9), "")).unwrap();

            assert_eq!(store.delete_doctor(2).unwrap(), DeleteOutcome::Deleted { cascaded: 2 }, "{}", store.backend_name());
            assert!(store.doctor(2).unwrap().is_none());

            let remaining = store.appointments().unwrap();
            assert_eq!(remaining.len(), 1);
            assert_eq!(remaining[0].id, kept);

            assert_eq!(store.delete_patient(3).unwrap(), DeleteOutcome::Deleted { cascaded: 1 });
            assert!(store.appointments().unwrap().is_empty());
        }
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_missing_ids_report_failure(ctx: &mut StoreTestContext) {
        for mut store in ctx.stores(None) {
            let doctor = DoctorForm::new("Dr. Nobody", "Cardiology", true);
            let patient = PatientForm::new("Nobody", "nobody@example.com");
            let appointment = AppointmentForm::new(1, 1, at(1, 9), "");

            assert!(!store.update_doctor(999, &doctor).unwrap());
            assert!(!store.set_doctor_availability(999, false).unwrap());
            assert!(!store.update_patient(999, &patient).unwrap());
            assert!(!store.update_appointment(999, &appointment).unwrap());
            assert!(!store.delete_appointment(999).unwrap());
            assert_eq!(store.delete_doctor(999).unwrap(), DeleteOutcome::NotFound);
            assert_eq!(store.delete_patient(999).unwrap(), DeleteOutcome::NotFound);
            assert!(store.doctor(999).unwrap().is_none());
            assert!(store.patient(999).unwrap().is_none());
            assert!(store.appointment(999).unwrap().is_none());
        }
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_available_doctors_is_the_available_subset(ctx: &mut StoreTestContext) {
        for mut store in ctx.stores(None) {
            assert!(store.set_doctor_availability(1, false).unwrap());
            store.add_doctor(&DoctorForm::new("Dr. Off", "Psychiatry", false)).unwrap();

            let all = store.doctors().unwrap();
            let expected: Vec<i32> = all.iter().filter(|d| d.available).map(|d| d.id).collect();
            let available: Vec<i32> = store.available_doctors().unwrap().iter().map(|d| d.id).collect();

            assert_eq!(available, expected, "{}", store.backend_name());
            assert_eq!(available, vec![2, 4, 5]);
        }
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_appointments_are_listed_newest_first(ctx: &mut StoreTestContext) {
        for mut store in ctx.stores(None) {
            let middle = store.book_appointment(&AppointmentForm::new(1, 1, at(10, 9), "")).unwrap();
            let oldest = store.book_appointment(&AppointmentForm::new(1, 2, at(2, 9), "")).unwrap();
            let newest = store.book_appointment(&AppointmentForm::new(2, 1, at(20, 9), "")).unwrap();

            let ids: Vec<i32> = store.appointments().unwrap().iter().map(|v| v.id).collect();
            assert_eq!(ids, vec![newest, middle, oldest], "{}", store.backend_name());

            let by_patient: Vec<i32> = store.appointments_by_patient(1).unwrap().iter().map(|v| v.id).collect();
            assert_eq!(by_patient, vec![newest, middle]);
        }
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_updates_are_visible(ctx: &mut StoreTestContext) {
        for mut store in ctx.stores(None) {
            let form = DoctorForm::new("Dr. John Smith-Jones", "Cardiology", false).with_phone("555-0199");
            assert!(store.update_doctor(1, &form).unwrap());
            let doctor = store.doctor(1).unwrap().unwrap();
            assert_eq!(doctor.full_name, "Dr. John Smith-Jones");
            assert!(!doctor.available);
            assert_eq!(doctor.phone.as_deref(), Some("555-0199"));

            assert!(store.update_patient(2, &PatientForm::new("Brian Taylor", "b.taylor@example.com")).unwrap());
            assert_eq!(store.patient(2).unwrap().unwrap().email, "b.taylor@example.com");

            let id = store.book_appointment(&AppointmentForm::new(1, 1, at(3, 9), "Checkup")).unwrap();
            assert!(store.update_appointment(id, &AppointmentForm::new(4, 5, at(4, 11), "Follow-up")).unwrap());

            let view = store.appointment(id).unwrap().unwrap();
            assert_eq!((view.doctor_id, view.patient_id), (4, 5));
            assert_eq!(view.date, at(4, 11));
            assert_eq!(view.notes.as_deref(), Some("Follow-up"));
            assert_eq!(view.patient_name, "Eva Martinez");
        }
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_default_delete_policies(ctx: &mut StoreTestContext) {
        for store in ctx.stores(None) {
            assert_eq!(store.delete_policy(), DeletePolicy::Cascade, "{}", store.backend_name());
        }
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_seed_records(ctx: &mut StoreTestContext) {
        for mut store in ctx.stores(None) {
            let doctor_ids: Vec<i32> = store.doctors().unwrap().iter().map(|d| d.id).collect();
            let patient_ids: Vec<i32> = store.patients().unwrap().iter().map(|p| p.id).collect();

            assert_eq!(doctor_ids, vec![1, 2, 3, 4, 5]);
            assert_eq!(patient_ids, vec![1, 2, 3, 4, 5]);
            assert!(store.appointments().unwrap().is_empty());
        }
    }
}
