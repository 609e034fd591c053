use crate::attendance::{compute_monthly_attendance, date_key, punches_for_day};
use crate::errors::AppError;
use crate::models::{
    DashboardResponse, LeaveRequestInput, LeaveRequestRecord, LoginRequest, LoginResponse,
    MirrorQuery, MirrorResponse, NewUser, PasswordRecoveryRequest, PasswordRecoveryResponse,
    ProfileResponse, PunchEvent, PunchKind, RegisterRequest, TodayPunchesResponse,
    UserCountsPatch, UserRecord,
};
use crate::punch::{build_punch, limit_reached, next_kind};
use crate::session::{bearer_token, Session};
use crate::state::AppState;
use crate::validation::{
    capitalize_each_word, validate_email, validate_leave_request, validate_login,
    validate_registration, ValidationError,
};
use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    Json,
};
use chrono::{Local, NaiveDate};
use tracing::{info, warn};

const NEW_USER_DESCRIPTION: &str = "Novo Colaborador";

pub async fn health() -> &'static str {
    "ok"
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    validate_login(&payload)?;

    let username = payload.username.trim();
    let users = state
        .backend
        .users_by_credentials(username, &payload.password)
        .await?;
    let Some(user) = users.into_iter().next() else {
        info!("rejected login for {username}");
        return Err(AppError::unauthorized("invalid username or password"));
    };

    let greeting = format!("Bem-vindo, {}!", user.preferred_name());
    let session = Session {
        user_id: user.id.clone(),
        username: user.username.clone(),
    };
    let token = state.sessions.open(session).await;
    info!(user_id = %user.id, username = %user.username, "session opened");

    Ok(Json(LoginResponse {
        token,
        user_id: user.id,
        greeting,
    }))
}

pub async fn logout(State(state): State<AppState>, request: Request) -> StatusCode {
    let (parts, _) = request.into_parts();
    if let Some(token) = bearer_token(&parts) {
        if let Some(session) = state.sessions.close(token).await {
            info!(user_id = %session.user_id, username = %session.username, "session closed");
        }
    }
    StatusCode::NO_CONTENT
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ProfileResponse>), AppError> {
    validate_registration(&payload)?;

    let new_user = NewUser {
        nome: payload.full_name.trim().to_string(),
        cpf: payload.cpf.trim().to_string(),
        username: payload.username.trim().to_string(),
        email: payload.email.trim().to_string(),
        password: payload.password,
        descricao: NEW_USER_DESCRIPTION.to_string(),
        avatar: String::new(),
        entradas: 0,
        saidas: 0,
        faltas: 0,
    };
    let created = state.backend.create_user(&new_user).await?;
    info!(user_id = %created.id, "registered user");

    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn password_recovery(
    State(state): State<AppState>,
    Json(payload): Json<PasswordRecoveryRequest>,
) -> Result<Json<PasswordRecoveryResponse>, AppError> {
    validate_email(&payload.email)?;

    let users = state.backend.users_by_email(payload.email.trim()).await?;
    if users.is_empty() {
        return Err(AppError::not_found("no user with that email"));
    }
    Ok(Json(PasswordRecoveryResponse { sent: true }))
}

pub async fn dashboard(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<DashboardResponse>, AppError> {
    let user = state.backend.user(&session.user_id).await?;
    let punches = state.backend.punches(&session.user_id, None).await?;
    let attendance = compute_monthly_attendance(&punches, today())?;

    Ok(Json(DashboardResponse {
        display_name: capitalize_each_word(user.preferred_name()),
        check_ins: user.entradas,
        check_outs: user.saidas,
        absences: attendance.absence_count,
        profile: user.into(),
    }))
}

pub async fn get_today_punches(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<TodayPunchesResponse>, AppError> {
    let date = today();
    let punches = todays_punches(&state, &session, date).await?;

    Ok(Json(TodayPunchesResponse {
        date: date_key(date),
        next_kind: next_kind(&punches),
        limit_reached: limit_reached(&punches),
        punches,
    }))
}

pub async fn register_punch(
    State(state): State<AppState>,
    session: Session,
) -> Result<(StatusCode, Json<PunchEvent>), AppError> {
    // held through the counter update
    let _guard = state.punch_locks.acquire(&session.user_id).await;
    let now = Local::now();
    let punches = todays_punches(&state, &session, now.date_naive()).await?;
    let punch = build_punch(&session.user_id, &now, &punches)?;
    let stored = state.backend.create_punch(&punch).await?;
    info!(user_id = %session.user_id, kind = stored.kind.as_str(), "punch registered");

    bump_user_counter(&state, &session.user_id, stored.kind).await;

    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn get_mirror(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<MirrorQuery>,
) -> Result<Json<MirrorResponse>, AppError> {
    let month = match query.month.as_deref() {
        Some(value) => parse_month(value)?,
        None => today(),
    };
    let punches = state.backend.punches(&session.user_id, None).await?;
    let attendance = compute_monthly_attendance(&punches, month)?;

    Ok(Json(MirrorResponse {
        month: month.format("%Y-%m").to_string(),
        attendance,
    }))
}

pub async fn submit_leave_request(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LeaveRequestInput>,
) -> Result<(StatusCode, Json<LeaveRequestRecord>), AppError> {
    validate_leave_request(&payload)?;

    let user = state.backend.user(&session.user_id).await?;
    let record = LeaveRequestRecord {
        id: None,
        user_id: user.id.clone(),
        employee_name: capitalize_each_word(user.preferred_name()),
        start_date: payload.start_date,
        end_date: payload.end_date,
        justification: payload.justification.trim().to_string(),
        attachment_name: payload.attachment_name,
        status: "pending".to_string(),
    };
    let stored = state.backend.create_leave_request(&record).await?;
    info!(user_id = %user.id, "leave request submitted");

    Ok((StatusCode::CREATED, Json(stored)))
}

async fn todays_punches(
    state: &AppState,
    session: &Session,
    date: NaiveDate,
) -> Result<Vec<PunchEvent>, AppError> {
    let punches = state.backend.punches(&session.user_id, Some(date)).await?;
    // the backend filter is advisory; keep only the requested date
    Ok(punches_for_day(&punches, date))
}

async fn bump_user_counter(state: &AppState, user_id: &str, kind: PunchKind) {
    let user: UserRecord = match state.backend.user(user_id).await {
        Ok(user) => user,
        Err(err) => {
            warn!("could not load user {user_id} to update counters: {err}");
            return;
        }
    };
    let patch = match kind {
        PunchKind::CheckIn => UserCountsPatch {
            entradas: Some(user.entradas.saturating_add(1)),
            ..Default::default()
        },
        PunchKind::CheckOut => UserCountsPatch {
            saidas: Some(user.saidas.saturating_add(1)),
            ..Default::default()
        },
    };
    if let Err(err) = state.backend.patch_user_counts(user_id, &patch).await {
        warn!("could not update counters for user {user_id}: {err}");
    }
}

fn parse_month(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(&format!("{}-01", value.trim()), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidMonth(value.to_string()))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_query_accepts_year_and_month() {
        let month = parse_month("2025-06").unwrap();
        assert_eq!(month, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(
            parse_month("06/2025"),
            Err(ValidationError::InvalidMonth("06/2025".to_string()))
        );
        assert!(parse_month("2025-13").is_err());
    }
}
