/// Every user-facing string of the application.
///
/// Text lives in the `Display` implementation in [`super::display`].
#[derive(Debug, Clone)]
pub enum Message {
    // === GENERAL MESSAGES ===
    OperationCancelled,
    ValidationFailed(String),
    InvalidDateTime(String),
    StoreUnavailable(String),

    // === CONFIGURATION MESSAGES ===
    ConfigSaved(String),
    ConfigModuleStorage,
    CurrentBackend(String),
    PromptBackend,
    PromptSqlitePath,
    PromptConnectionString,
    PromptDataDir,
    PromptDeletePolicy,
    DeletePolicyBackendDefault,
    ConnectionStringFromEnv,

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),
    RunningMigration(u32, String),
    MigrationFailed(u32, String),
    DatabaseReady,
    DatabaseUpToDate,
    DbVersion(u32, u32), // current, latest
    MigrationHistoryHeader,
    NoMigrationsApplied,
    MigrationsNotSupported(String), // backend

    // === DOCTOR MESSAGES ===
    DoctorsHeader,
    AvailableDoctorsHeader,
    NoDoctorsFound,
    NoAvailableDoctors,
    DoctorCreated(i32),
    DoctorUpdated(i32),
    DoctorNotFound(i32),
    DoctorDeleted(i32),
    DoctorDeletedWithAppointments(i32, usize),
    DoctorDeleteBlocked(i32, usize),
    DoctorAvailabilityChanged(i32, bool),
    DoctorUnavailable(String),
    DoctorAppointmentsHeader(String),
    EditingDoctor(String),
    ConfirmDeleteDoctor(String),
    PromptDoctorName,
    PromptSpecialty,
    PromptCustomSpecialty,
    OtherSpecialty,
    PromptPhone,
    PromptDoctorAvailable,
    SelectDoctor,
    SelectDoctorAction,

    // === PATIENT MESSAGES ===
    PatientsHeader,
    NoPatientsFound,
    PatientCreated(i32),
    PatientUpdated(i32),
    PatientNotFound(i32),
    PatientDeleted(i32),
    PatientDeletedWithAppointments(i32, usize),
    PatientDeleteBlocked(i32, usize),
    PatientAppointmentsHeader(String),
    EditingPatient(String),
    ConfirmDeletePatient(String),
    PromptPatientName,
    PromptPatientEmail,
    SelectPatient,
    SelectPatientAction,

    // === APPOINTMENT MESSAGES ===
    AppointmentsHeader,
    NoAppointmentsFound,
    AppointmentBooked(i32),
    AppointmentUpdated(i32),
    AppointmentNotFound(i32),
    AppointmentDeleted(i32),
    AppointmentDetailsHeader(i32),
    AppointmentSearchResults(String),
    NoAppointmentsMatching(String),
    EditingAppointment(i32),
    ConfirmDeleteAppointment(i32),
    PromptAppointmentDate,
    PromptNotes,
    PromptSearchQuery,
    SelectAppointment,
    SelectAppointmentAction,

    // === EXPORT MESSAGES ===
    ExportCompleted(String),
    ExportNothingToExport,
    ExportFailed(String),
}
