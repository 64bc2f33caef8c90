#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use medapp::db::files::{Collection, FileStore, APPOINTMENTS_FILE_NAME, DOCTORS_FILE_NAME, PATIENTS_FILE_NAME};
    use medapp::db::{ClinicStore, DeleteOutcome, DeletePolicy};
    use medapp::libs::appointment::AppointmentForm;
    use medapp::libs::doctor::{Doctor, DoctorForm};
    use medapp::libs::patient::PatientForm;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct FileStoreTestContext {
        temp_dir: TempDir,
    }

    impl TestContext for FileStoreTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            FileStoreTestContext { temp_dir }
        }
    }

    impl FileStoreTestContext {
        fn dir(&self) -> PathBuf {
            self.temp_dir.path().join("data")
        }

        /// Replaces a data file with a directory so writing it fails.
        fn break_file(&self, file: &str) {
            let path = self.dir().join(file);
            fs::remove_file(&path).unwrap();
            fs::create_dir(&path).unwrap();
        }

        fn repair_file(&self, file: &str) {
            fs::remove_dir(self.dir().join(file)).unwrap();
        }
    }

    #[test_context(FileStoreTestContext)]
    #[test]
    fn test_open_creates_seeded_files(ctx: &mut FileStoreTestContext) {
        let store = FileStore::open(&ctx.dir()).unwrap();
        assert_eq!(store.dir(), ctx.dir().as_path());

        for file in [DOCTORS_FILE_NAME, PATIENTS_FILE_NAME, APPOINTMENTS_FILE_NAME] {
            assert!(ctx.dir().join(file).exists(), "{} missing", file);
        }

        let content = fs::read_to_string(ctx.dir().join(DOCTORS_FILE_NAME)).unwrap();
        let doctors: Collection<Doctor> = serde_json::from_str(&content).unwrap();
        assert_eq!(doctors.rows.len(), 5);
        assert_eq!(doctors.last_id, 5);
    }

    #[test_context(FileStoreTestContext)]
    #[test]
    fn test_changes_survive_reopen(ctx: &mut FileStoreTestContext) {
        let date = NaiveDate::from_ymd_opt(2030, 6, 1).unwrap().and_hms_opt(10, 30, 0).unwrap();
        let (doctor_id, appointment_id) = {
            let mut store = FileStore::open(&ctx.dir()).unwrap();
            let doctor_id = store.add_doctor(&DoctorForm::new("Dr. Ada Park", "Orthopedics", true)).unwrap();
            let appointment_id = store.book_appointment(&AppointmentForm::new(doctor_id, 4, date, "Knee")).unwrap();
            (doctor_id, appointment_id)
        };

        let mut store = FileStore::open(&ctx.dir()).unwrap();
        assert_eq!(store.doctor(doctor_id).unwrap().unwrap().full_name, "Dr. Ada Park");

        let view = store.appointment(appointment_id).unwrap().unwrap();
        assert_eq!(view.date, date);
        assert_eq!(view.patient_name, "Daniel Wilson");
        assert_eq!(view.notes.as_deref(), Some("Knee"));
    }

    #[test_context(FileStoreTestContext)]
    #[test]
    fn test_high_water_mark_survives_reopen(ctx: &mut FileStoreTestContext) {
        {
            let mut store = FileStore::open(&ctx.dir()).unwrap();
            let id = store.add_patient(&PatientForm::new("Short Stay", "short@example.com")).unwrap();
            assert_eq!(id, 6);
            assert_eq!(store.delete_patient(id).unwrap(), DeleteOutcome::Deleted { cascaded: 0 });
        }

        let mut store = FileStore::open(&ctx.dir()).unwrap();
        let id = store.add_patient(&PatientForm::new("Next", "next@example.com")).unwrap();
        assert_eq!(id, 7);
    }

    #[test_context(FileStoreTestContext)]
    #[test]
    fn test_file_without_mark_uses_row_ids(ctx: &mut FileStoreTestContext) {
        fs::create_dir_all(ctx.dir()).unwrap();
        fs::write(
            ctx.dir().join(DOCTORS_FILE_NAME),
            r#"{"rows":[{"id":9,"full_name":"Dr. Old","specialty":"Neurology","available":true}]}"#,
        )
        .unwrap();

        let mut store = FileStore::open(&ctx.dir()).unwrap();
        let doctors = store.doctors().unwrap();
        assert_eq!(doctors.len(), 1);
        assert_eq!(doctors[0].phone, None);

        let id = store.add_doctor(&DoctorForm::new("Dr. New", "Neurology", true)).unwrap();
        assert_eq!(id, 10);
    }

    #[test_context(FileStoreTestContext)]
    #[test]
    fn test_dangling_references_are_accepted_but_not_listed(ctx: &mut FileStoreTestContext) {
        let mut store = FileStore::open(&ctx.dir()).unwrap();
        let date = NaiveDate::from_ymd_opt(2030, 1, 2).unwrap().and_hms_opt(8, 0, 0).unwrap();

        let id = store.book_appointment(&AppointmentForm::new(999, 1, date, "")).unwrap();
        assert!(id > 0);
        assert!(store.appointments().unwrap().is_empty());
        assert!(store.appointment(id).unwrap().is_none());

        // Still stored, so it can be removed directly
        assert!(store.delete_appointment(id).unwrap());
    }

    #[test_context(FileStoreTestContext)]
    #[test]
    fn test_blocking_policy_leaves_files_untouched(ctx: &mut FileStoreTestContext) {
        let mut store = FileStore::open(&ctx.dir()).unwrap().with_delete_policy(DeletePolicy::Block);
        assert_eq!(store.delete_policy(), DeletePolicy::Block);

        let date = NaiveDate::from_ymd_opt(2030, 1, 2).unwrap().and_hms_opt(8, 0, 0).unwrap();
        store.book_appointment(&AppointmentForm::new(5, 5, date, "")).unwrap();
        let before = fs::read_to_string(ctx.dir().join(DOCTORS_FILE_NAME)).unwrap();

        assert_eq!(store.delete_doctor(5).unwrap(), DeleteOutcome::Blocked { appointments: 1 });
        assert_eq!(fs::read_to_string(ctx.dir().join(DOCTORS_FILE_NAME)).unwrap(), before);
    }

    #[test_context(FileStoreTestContext)]
    #[test]
    fn test_corrupt_file_is_an_error(ctx: &mut FileStoreTestContext) {
        fs::create_dir_all(ctx.dir()).unwrap();
        fs::write(ctx.dir().join(PATIENTS_FILE_NAME), "not json").unwrap();

        assert!(FileStore::open(&ctx.dir()).is_err());
    }

    #[test_context(FileStoreTestContext)]
    #[test]
    fn test_failed_write_leaves_records_unchanged(ctx: &mut FileStoreTestContext) {
        let mut store = FileStore::open(&ctx.dir()).unwrap();
        let date = NaiveDate::from_ymd_opt(2030, 2, 3).unwrap().and_hms_opt(11, 0, 0).unwrap();
        let appointment_id = store.book_appointment(&AppointmentForm::new(1, 1, date, "Kept")).unwrap();
        let doctors_before = store.doctors().unwrap();

        ctx.break_file(DOCTORS_FILE_NAME);
        assert!(store.add_doctor(&DoctorForm::new("Dr. Ghost", "Neurology", true)).is_err());
        assert!(store.update_doctor(1, &DoctorForm::new("Dr. Renamed", "Neurology", true)).is_err());
        assert!(store.set_doctor_availability(2, false).is_err());
        assert!(store.delete_doctor(3).is_err());
        assert_eq!(store.doctors().unwrap(), doctors_before);

        ctx.break_file(APPOINTMENTS_FILE_NAME);
        assert!(store.book_appointment(&AppointmentForm::new(2, 2, date, "Lost")).is_err());
        assert!(store.delete_appointment(appointment_id).is_err());
        let ids: Vec<i32> = store.appointments().unwrap().iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![appointment_id]);

        // The failed add did not consume an identifier
        ctx.repair_file(DOCTORS_FILE_NAME);
        assert_eq!(store.add_doctor(&DoctorForm::new("Dr. Real", "Neurology", true)).unwrap(), 6);
    }

    #[test_context(FileStoreTestContext)]
    #[test]
    fn test_cascade_keeps_doctor_when_its_file_fails(ctx: &mut FileStoreTestContext) {
        let mut store = FileStore::open(&ctx.dir()).unwrap().with_delete_policy(DeletePolicy::Cascade);
        let date = NaiveDate::from_ymd_opt(2030, 2, 3).unwrap().and_hms_opt(11, 0, 0).unwrap();
        store.book_appointment(&AppointmentForm::new(1, 1, date, "")).unwrap();

        ctx.break_file(DOCTORS_FILE_NAME);
        assert!(store.delete_doctor(1).is_err());

        // appointments.json was already written; memory matches the files
        assert!(store.doctor(1).unwrap().is_some());
        assert!(store.appointments_by_doctor(1).unwrap().is_empty());

        ctx.repair_file(DOCTORS_FILE_NAME);
        let mut reopened = FileStore::open(&ctx.dir()).unwrap();
        assert!(reopened.appointments_by_doctor(1).unwrap().is_empty());
    }
}
