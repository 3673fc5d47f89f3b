use std::net::SocketAddr;
use std::sync::Arc;

use secrecy::SecretString;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use clinica_server::adapter::handler::{router, AppState};
use clinica_server::domain::entity::appointment::{Appointment, AppointmentUpdate, NewAppointment};
use clinica_server::domain::entity::doctor::{Doctor, DoctorUpdate, NewDoctor};
use clinica_server::domain::entity::patient::{NewPatient, Patient, PatientUpdate};
use clinica_server::domain::entity::principal::Principal;
use clinica_server::domain::repository::{
    AppointmentRepository, DoctorRepository, PatientRepository,
};
use clinica_server::infrastructure::{
    IdentityProvider, ProviderSession, SupabaseClient, SupabaseConfig,
};

/// Application configuration.
#[derive(Debug, Clone, Default, serde::Deserialize)]
struct Config {
    #[serde(default)]
    app: AppConfig,
    #[serde(default)]
    server: ServerConfig,
    #[serde(default)]
    supabase: Option<SupabaseConfig>,
}

#[derive(Debug, Clone, serde::Deserialize)]
struct AppConfig {
    #[serde(default = "default_app_name")]
    name: String,
    #[serde(default = "default_environment")]
    environment: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            environment: default_environment(),
        }
    }
}

fn default_app_name() -> String {
    "clinica-server".to_string()
}

fn default_environment() -> String {
    "dev".to_string()
}

#[derive(Debug, Clone, serde::Deserialize)]
struct ServerConfig {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn init_tracing() {
    // RUST_LOG があればそれを優先する。
    // Ex: RUST_LOG=info,clinica_server=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json())
        .init();
}

/// 環境変数が揃っていれば設定ファイルより優先する（デプロイ先では env 注入が標準）。
fn supabase_config_from_env() -> Option<SupabaseConfig> {
    let url = std::env::var("SUPABASE_URL").ok()?;
    let anon_key = std::env::var("SUPABASE_ANON_KEY").ok()?;
    let service_role_key = std::env::var("SUPABASE_SERVICE_ROLE_KEY").ok()?;
    Some(SupabaseConfig {
        url,
        anon_key,
        service_role_key: SecretString::new(service_role_key),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    // Config
    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/config.yaml".to_string());
    let cfg: Config = match std::fs::read_to_string(&config_path) {
        Ok(content) => serde_yaml::from_str(&content)?,
        Err(_) => {
            info!(path = %config_path, "config file not found, using defaults");
            Config::default()
        }
    };

    info!(
        app_name = %cfg.app.name,
        environment = %cfg.app.environment,
        "starting clinica server"
    );

    // Supabase client (env vars > config file > in-memory stub)
    let supabase_config = supabase_config_from_env().or(cfg.supabase);

    let state = if let Some(supabase_config) = supabase_config {
        info!(url = %supabase_config.url, "using supabase auth/data platform");
        let supabase = Arc::new(SupabaseClient::new(supabase_config));
        AppState::new(
            supabase.clone(),
            supabase.clone(),
            supabase.clone(),
            supabase,
        )
    } else {
        info!("no supabase credentials configured, using in-memory stub repositories");
        AppState::new(
            Arc::new(StubIdentityProvider),
            Arc::new(InMemoryDoctorRepository::new()),
            Arc::new(InMemoryPatientRepository::new()),
            Arc::new(InMemoryAppointmentRepository::new()),
        )
    };

    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!("REST server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Stub implementations for dev mode ---

struct StubIdentityProvider;

#[async_trait::async_trait]
impl IdentityProvider for StubIdentityProvider {
    async fn verify_token(&self, _access_token: &str) -> anyhow::Result<Principal> {
        anyhow::bail!("stub identity provider: not configured")
    }

    async fn sign_in(&self, _email: &str, _password: &str) -> anyhow::Result<ProviderSession> {
        anyhow::bail!("stub identity provider: not configured")
    }

    async fn refresh_session(&self, _refresh_token: &str) -> anyhow::Result<ProviderSession> {
        anyhow::bail!("stub identity provider: not configured")
    }

    async fn sign_out(&self, _access_token: &str) -> anyhow::Result<()> {
        Ok(())
    }

    async fn admin_create_user(&self, _email: &str, _password: &str) -> anyhow::Result<String> {
        Ok(uuid::Uuid::new_v4().to_string())
    }
}

/// InMemoryDoctorRepository は開発用のインメモリ医師リポジトリ。
struct InMemoryDoctorRepository {
    doctors: tokio::sync::RwLock<Vec<Doctor>>,
}

impl InMemoryDoctorRepository {
    fn new() -> Self {
        Self {
            doctors: tokio::sync::RwLock::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl DoctorRepository for InMemoryDoctorRepository {
    async fn create(&self, doctor: &NewDoctor, _password: &str) -> anyhow::Result<Doctor> {
        let created = Doctor {
            id: uuid::Uuid::new_v4().to_string(),
            first_name: doctor.first_name.clone(),
            last_name: doctor.last_name.clone(),
            email: doctor.email.clone(),
            role: doctor.role.clone(),
            salary: doctor.salary,
            is_medical_director: doctor.is_medical_director,
            specialization: doctor.specialization.clone(),
        };
        self.doctors.write().await.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<Doctor>> {
        let doctors = self.doctors.read().await;
        Ok(doctors.iter().find(|d| d.id == id).cloned())
    }

    async fn list(&self) -> anyhow::Result<Vec<Doctor>> {
        Ok(self.doctors.read().await.clone())
    }

    async fn update(&self, id: &str, update: &DoctorUpdate) -> anyhow::Result<Option<Doctor>> {
        let mut doctors = self.doctors.write().await;
        if let Some(doctor) = doctors.iter_mut().find(|d| d.id == id) {
            if let Some(first_name) = &update.first_name {
                doctor.first_name = first_name.clone();
            }
            if let Some(last_name) = &update.last_name {
                doctor.last_name = last_name.clone();
            }
            if let Some(salary) = update.salary {
                doctor.salary = salary;
            }
            if let Some(is_medical_director) = update.is_medical_director {
                doctor.is_medical_director = is_medical_director;
            }
            if let Some(specialization) = &update.specialization {
                doctor.specialization = specialization.clone();
            }
            Ok(Some(doctor.clone()))
        } else {
            Ok(None)
        }
    }

    async fn delete(&self, id: &str) -> anyhow::Result<bool> {
        let mut doctors = self.doctors.write().await;
        let len_before = doctors.len();
        doctors.retain(|d| d.id != id);
        Ok(doctors.len() != len_before)
    }
}

/// InMemoryPatientRepository は開発用のインメモリ患者リポジトリ。
struct InMemoryPatientRepository {
    patients: tokio::sync::RwLock<Vec<Patient>>,
}

impl InMemoryPatientRepository {
    fn new() -> Self {
        Self {
            patients: tokio::sync::RwLock::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl PatientRepository for InMemoryPatientRepository {
    async fn create(&self, patient: &NewPatient) -> anyhow::Result<Patient> {
        let created = Patient {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id: patient.patient_id.clone(),
            name: patient.name.clone(),
            address: patient.address.clone(),
            phone_number: patient.phone_number.clone(),
            profession: patient.profession.clone(),
            children_number: patient.children_number,
            family_situation: patient.family_situation.clone(),
            birth_date: patient.birth_date,
        };
        self.patients.write().await.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<Patient>> {
        let patients = self.patients.read().await;
        Ok(patients.iter().find(|p| p.id == id).cloned())
    }

    async fn list(&self) -> anyhow::Result<Vec<Patient>> {
        Ok(self.patients.read().await.clone())
    }

    async fn update(&self, id: &str, update: &PatientUpdate) -> anyhow::Result<Option<Patient>> {
        let mut patients = self.patients.write().await;
        if let Some(patient) = patients.iter_mut().find(|p| p.id == id) {
            if let Some(name) = &update.name {
                patient.name = name.clone();
            }
            if let Some(address) = &update.address {
                patient.address = address.clone();
            }
            if let Some(phone_number) = &update.phone_number {
                patient.phone_number = phone_number.clone();
            }
            if let Some(profession) = &update.profession {
                patient.profession = profession.clone();
            }
            if let Some(children_number) = update.children_number {
                patient.children_number = children_number;
            }
            if let Some(family_situation) = &update.family_situation {
                patient.family_situation = family_situation.clone();
            }
            if let Some(birth_date) = update.birth_date {
                patient.birth_date = birth_date;
            }
            Ok(Some(patient.clone()))
        } else {
            Ok(None)
        }
    }

    async fn delete(&self, id: &str) -> anyhow::Result<bool> {
        let mut patients = self.patients.write().await;
        let len_before = patients.len();
        patients.retain(|p| p.id != id);
        Ok(patients.len() != len_before)
    }
}

/// InMemoryAppointmentRepository は開発用のインメモリ予約リポジトリ。
struct InMemoryAppointmentRepository {
    appointments: tokio::sync::RwLock<Vec<Appointment>>,
    next_id: std::sync::atomic::AtomicI64,
}

impl InMemoryAppointmentRepository {
    fn new() -> Self {
        Self {
            appointments: tokio::sync::RwLock::new(Vec::new()),
            next_id: std::sync::atomic::AtomicI64::new(1),
        }
    }
}

#[async_trait::async_trait]
impl AppointmentRepository for InMemoryAppointmentRepository {
    async fn create(&self, appointment: &NewAppointment) -> anyhow::Result<Appointment> {
        let id = self
            .next_id
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let created = Appointment {
            id,
            created_at: Some(chrono::Utc::now()),
            date: appointment.date,
            estimated_duration: appointment.estimated_duration.clone(),
            doctor_id: appointment.doctor_id.clone(),
            patient_id: appointment.patient_id.clone(),
            room_number: appointment.room_number,
            status: appointment.status.clone(),
            reason: appointment.reason.clone(),
        };
        self.appointments.write().await.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Appointment>> {
        let appointments = self.appointments.read().await;
        Ok(appointments.iter().find(|a| a.id == id).cloned())
    }

    async fn list(&self) -> anyhow::Result<Vec<Appointment>> {
        Ok(self.appointments.read().await.clone())
    }

    async fn update(
        &self,
        id: i64,
        update: &AppointmentUpdate,
    ) -> anyhow::Result<Option<Appointment>> {
        let mut appointments = self.appointments.write().await;
        if let Some(appointment) = appointments.iter_mut().find(|a| a.id == id) {
            if let Some(date) = update.date {
                appointment.date = date;
            }
            if let Some(estimated_duration) = &update.estimated_duration {
                appointment.estimated_duration = Some(estimated_duration.clone());
            }
            if let Some(room_number) = update.room_number {
                appointment.room_number = Some(room_number);
            }
            if let Some(status) = &update.status {
                appointment.status = Some(status.clone());
            }
            if let Some(reason) = &update.reason {
                appointment.reason = Some(reason.clone());
            }
            Ok(Some(appointment.clone()))
        } else {
            Ok(None)
        }
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let mut appointments = self.appointments.write().await;
        let len_before = appointments.len();
        appointments.retain(|a| a.id != id);
        Ok(appointments.len() != len_before)
    }
}
