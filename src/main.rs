use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use hostel_desk::config::AppConfig;
use hostel_desk::error::AppError;
use hostel_desk::telemetry;
use hostel_desk::workflows::desk::{
    desk_router, ComplaintCategory, ComplaintForm, DeskService, MemoryDeskStore, NoticeAudience,
    NoticeForm,
};
use hostel_desk::workflows::residency::{
    residency_router, AdmissionCategory, ApplicationForm, BedNumber, HostelBuilding, LogNotifier,
    MemoryHostelStore, ResidencyService,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Hostel Desk",
    about = "Run the hostel application and room allotment service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run a scripted allocation round against in-memory stores and print
    /// the resulting roster
    Demo,
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

type InMemoryResidency = ResidencyService<MemoryHostelStore, MemoryHostelStore, LogNotifier>;
type InMemoryDesk = DeskService<MemoryDeskStore, MemoryDeskStore>;

fn build_services() -> (Arc<InMemoryResidency>, Arc<InMemoryDesk>) {
    let hostel_store = Arc::new(MemoryHostelStore::new());
    let desk_store = Arc::new(MemoryDeskStore::new());

    let residency = Arc::new(ResidencyService::new(
        hostel_store.clone(),
        hostel_store,
        Arc::new(LogNotifier),
    ));
    let desk = Arc::new(DeskService::new(desk_store.clone(), desk_store));

    (residency, desk)
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Demo => run_demo(),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let (residency, desk) = build_services();

    let operational = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state);

    let app = operational
        .merge(residency_router(residency))
        .merge(desk_router(desk))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "hostel desk service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

fn demo_form(student_id: &str, name: &str, cgpa: f32) -> ApplicationForm {
    ApplicationForm {
        student_id: student_id.to_string(),
        full_name: name.to_string(),
        email: format!("{student_id}@college.example"),
        phone: "9876543210".to_string(),
        guardian_phone: "9123456780".to_string(),
        cgpa,
        category: AdmissionCategory::General,
    }
}

fn run_demo() -> Result<(), AppError> {
    let (residency, desk) = build_services();

    println!("Hostel desk demo");

    let first = residency.submit(demo_form("21CS014", "Asha Verma", 9.2))?;
    let second = residency.submit(demo_form("21ME007", "Rohan Gupta", 7.5))?;
    let third = residency.submit(demo_form("21EE031", "Neel Shah", 6.0))?;

    println!("\nPending applications by CGPA");
    for application in residency.list_applications(None)? {
        println!(
            "- {} | {} | cgpa {:.1} | {}",
            application.application_id,
            application.profile.full_name,
            application.cgpa,
            application.status
        );
    }

    residency.reject(&third.application_id)?;
    println!("\nRejected {} (hostel quota)", third.application_id);

    let allotted = residency.allot_room(
        &first.application_id,
        HostelBuilding::BlockA,
        "101",
        BedNumber::One,
    )?;
    println!(
        "Allotted {} -> {} room {} bed {} (floor {})",
        allotted.application_id,
        allotted.building,
        allotted.room_number,
        allotted.bed_number,
        allotted.floor
    );

    let allotted = residency.allot_room(
        &second.application_id,
        HostelBuilding::BlockA,
        "101",
        BedNumber::Two,
    )?;
    println!(
        "Allotted {} -> {} room {} bed {} (floor {})",
        allotted.application_id,
        allotted.building,
        allotted.room_number,
        allotted.bed_number,
        allotted.floor
    );

    let occupancy = residency.room_occupancy(HostelBuilding::BlockA, "101")?;
    println!(
        "\nA Block room 101 occupancy: {}/2, beds {:?}",
        occupancy.occupied_count, occupancy.occupied_beds
    );

    let complaint = desk.file_complaint(ComplaintForm {
        student_id: "21CS014".to_string(),
        category: ComplaintCategory::Maintenance,
        subject: "Ceiling fan not working".to_string(),
        description: "Fan in room 101 stopped this morning.".to_string(),
    })?;
    let complaint = desk.resolve_complaint(&complaint.complaint_id)?;
    println!(
        "\nComplaint {} ({}) is now {}",
        complaint.complaint_id,
        complaint.category.label(),
        complaint.status
    );

    desk.post_notice(NoticeForm {
        title: "Mess timings revised".to_string(),
        body: "Dinner now served 19:30-21:30.".to_string(),
        audience: NoticeAudience::Residents,
    })?;
    println!("\nNotice board");
    for notice in desk.list_notices(None)? {
        println!(
            "- #{} [{}] {} ({})",
            notice.notice_id,
            notice.audience.label(),
            notice.title,
            notice.posted_on
        );
    }

    Ok(())
}
