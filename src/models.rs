use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Backend ids arrive either as strings or as numbers depending on who created the record.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Text(String),
    Number(i64),
}

impl From<WireId> for String {
    fn from(id: WireId) -> Self {
        match id {
            WireId::Text(text) => text,
            WireId::Number(number) => number.to_string(),
        }
    }
}

fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    WireId::deserialize(deserializer).map(String::from)
}

fn deserialize_optional_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<WireId>::deserialize(deserializer)?.map(String::from))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PunchKind {
    #[serde(rename = "entrada")]
    CheckIn,
    #[serde(rename = "saida")]
    CheckOut,
}

impl PunchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PunchKind::CheckIn => "check-in",
            PunchKind::CheckOut => "check-out",
        }
    }
}

/// A punch record exactly as the backend stores it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPunch {
    #[serde(
        default,
        deserialize_with = "deserialize_optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(deserialize_with = "deserialize_id")]
    pub user_id: String,
    #[serde(rename = "dataHora")]
    pub label: String,
    pub timestamp: i64,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: PunchKind,
}

/// A punch event that passed the backend schema check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PunchEvent {
    pub id: Option<String>,
    pub date: String,
    pub timestamp: i64,
    pub label: String,
    pub kind: PunchKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DayRecord {
    pub label: String,
    pub check_in: String,
    pub check_out: String,
}

impl DayRecord {
    pub fn empty(label: String) -> Self {
        Self {
            label,
            ..Self::default()
        }
    }

    pub fn is_blank(&self) -> bool {
        self.check_in.is_empty() && self.check_out.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyAttendance {
    pub records: Vec<DayRecord>,
    pub absence_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub descricao: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub entradas: u64,
    #[serde(default)]
    pub saidas: u64,
}

impl UserRecord {
    /// Name shown to the user: full name, then username, then email.
    pub fn preferred_name(&self) -> &str {
        [
            self.name.as_deref().unwrap_or(""),
            self.nome.as_str(),
            self.username.as_str(),
            self.email.as_str(),
        ]
        .into_iter()
        .find(|value| !value.trim().is_empty())
        .unwrap_or("")
    }
}

#[derive(Debug, Serialize)]
pub struct NewUser {
    pub nome: String,
    pub cpf: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub descricao: String,
    pub avatar: String,
    pub entradas: u64,
    pub saidas: u64,
    pub faltas: u64,
}

#[derive(Debug, Serialize, Default)]
pub struct UserCountsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entradas: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saidas: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: String,
    pub greeting: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub cpf: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordRecoveryRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct PasswordRecoveryResponse {
    pub sent: bool,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub description: String,
    pub avatar: String,
}

impl From<UserRecord> for ProfileResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            description: user.descricao,
            avatar: user.avatar,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub profile: ProfileResponse,
    pub display_name: String,
    pub check_ins: u64,
    pub check_outs: u64,
    pub absences: u32,
}

#[derive(Debug, Serialize)]
pub struct TodayPunchesResponse {
    pub date: String,
    pub punches: Vec<PunchEvent>,
    pub next_kind: PunchKind,
    pub limit_reached: bool,
}

#[derive(Debug, Deserialize)]
pub struct MirrorQuery {
    pub month: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MirrorResponse {
    pub month: String,
    #[serde(flatten)]
    pub attendance: MonthlyAttendance,
}

#[derive(Debug, Deserialize)]
pub struct LeaveRequestInput {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub justification: String,
    #[serde(default)]
    pub attachment_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequestRecord {
    #[serde(
        default,
        deserialize_with = "deserialize_optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    pub user_id: String,
    pub employee_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub justification: String,
    #[serde(default)]
    pub attachment_name: Option<String>,
    pub status: String,
}
