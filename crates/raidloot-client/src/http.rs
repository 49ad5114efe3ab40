//! HTTP implementation of the server bridge.
//!
//! One [`HttpServerBridge`] owns the reqwest client, the in-memory bearer
//! token, and the on-disk [`TokenStore`]. Every authenticated request
//! attaches the token; responses are classified into [`AppError`]s so the
//! application layer can tell a dead network from a dead token:
//!
//! - a `401` carrying our token means the token expired, and the session
//!   layer reacts by signing out;
//! - a `401` without one means bad credentials on the login form;
//! - a `403` means the account is signed in but not allowed;
//! - everything else surfaces the backend's own `detail` message.

use async_lock::RwLock;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use raidloot_app::errors::{AppError, AuthFailure, NetworkErrorCode};
use raidloot_app::server_bridge::{
    DistributionFilter, ItemFilter, PageRequest, PartyFilter, ServerBridge,
};
use raidloot_core::{
    AvailableJobs, Distribution, DistributionId, DistributionMethod, EquipmentChoice,
    EquipmentSet, GearSetKind, GearSlot, Item, ItemId, Job, JobId, MemberCurrencyRequirements,
    Party, PartyId, PartyMember, PartyMemberId, PriorityBoard, Raid, RaidId, RaidSchedule, Role,
    ScheduleId, User, UserCharacter, UserId,
};

use crate::config::ClientConfig;
use crate::token::TokenStore;

/// Server bridge talking JSON over HTTP to the backend.
pub struct HttpServerBridge {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
    // Account id behind the token, fetched lazily. Member-scoped
    // endpoints (characters, leaving a party) address by account id.
    identity: RwLock<Option<UserId>>,
    store: TokenStore,
}

impl HttpServerBridge {
    /// Build a bridge and pick up any token stored by an earlier run.
    pub fn new(config: ClientConfig) -> Result<Self, AppError> {
        let store = TokenStore::new()
            .map_err(|error| AppError::internal("token store", error.to_string()))?;
        Self::with_store(config, store)
    }

    /// Build against an explicit token store. Tests point this at a
    /// temporary directory.
    pub fn with_store(config: ClientConfig, store: TokenStore) -> Result<Self, AppError> {
        let token = match store.load() {
            Ok(token) => token,
            Err(error) => {
                tracing::warn!(%error, "could not read stored token, starting signed out");
                None
            }
        };
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|error| AppError::internal("http client", error.to_string()))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            token: RwLock::new(token),
            identity: RwLock::new(None),
            store,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Attach the stored token, reporting whether one was attached. The
    /// flag decides how a later `401` is read.
    async fn authorize(&self, request: reqwest::RequestBuilder) -> (reqwest::RequestBuilder, bool) {
        match self.token.read().await.as_deref() {
            Some(token) => (request.bearer_auth(token), true),
            None => (request, false),
        }
    }

    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        had_token: bool,
    ) -> Result<reqwest::Response, AppError> {
        let response = request.send().await.map_err(map_transport)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(error_from_response(status.as_u16(), &body, had_token))
    }

    /// GET with the stored token and a JSON response.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let (request, had_token) = self.authorize(self.http.get(self.url(path))).await;
        let response = self.execute(request, had_token).await?;
        response.json().await.map_err(map_transport)
    }

    /// GET with query parameters, the stored token, and a JSON response.
    async fn get_json_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let (request, had_token) = self
            .authorize(self.http.get(self.url(path)).query(query))
            .await;
        let response = self.execute(request, had_token).await?;
        response.json().await.map_err(map_transport)
    }

    /// POST a JSON body with the stored token and parse a JSON response.
    async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, AppError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let (request, had_token) = self
            .authorize(self.http.post(self.url(path)).json(body))
            .await;
        let response = self.execute(request, had_token).await?;
        response.json().await.map_err(map_transport)
    }

    /// DELETE with the stored token, ignoring the confirmation body.
    async fn delete(&self, path: &str) -> Result<(), AppError> {
        let (request, had_token) = self.authorize(self.http.delete(self.url(path))).await;
        self.execute(request, had_token).await?;
        Ok(())
    }

    /// The account id behind the stored token, fetched once per login.
    async fn identity(&self) -> Result<UserId, AppError> {
        if let Some(id) = *self.identity.read().await {
            return Ok(id);
        }
        let user = self.current_user().await?;
        Ok(user.id)
    }
}

#[async_trait]
impl ServerBridge for HttpServerBridge {
    async fn login(&self, username: &str, password: &str) -> Result<(), AppError> {
        // Deliberately unauthenticated: a stale token must not turn a
        // wrong password into an expired-session signal.
        let form = [("username", username), ("password", password)];
        let request = self.http.post(self.url("/auth/login")).form(&form);
        let response = self.execute(request, false).await?;
        let payload: TokenPayload = response.json().await.map_err(map_transport)?;

        if let Err(error) = self.store.save(&payload.access_token) {
            tracing::warn!(%error, "token not persisted, session will not survive a restart");
        }
        *self.token.write().await = Some(payload.access_token);
        *self.identity.write().await = None;
        Ok(())
    }

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let body = RegisterBody {
            username,
            email,
            password,
        };
        let request = self.http.post(self.url("/auth/register")).json(&body);
        let response = self.execute(request, false).await?;
        response.json().await.map_err(map_transport)
    }

    async fn current_user(&self) -> Result<User, AppError> {
        let user: User = self.get_json("/auth/me").await?;
        *self.identity.write().await = Some(user.id);
        Ok(user)
    }

    async fn change_password(&self, current: &str, new: &str) -> Result<(), AppError> {
        let request = self
            .http
            .post(self.url("/auth/change-password"))
            .query(&[("current_password", current), ("new_password", new)]);
        let (request, had_token) = self.authorize(request).await;
        self.execute(request, had_token).await?;
        Ok(())
    }

    async fn has_credentials(&self) -> bool {
        self.token.read().await.is_some()
    }

    async fn discard_credentials(&self) -> Result<(), AppError> {
        *self.token.write().await = None;
        *self.identity.write().await = None;
        self.store
            .clear()
            .map_err(|error| AppError::internal("token store", error.to_string()))
    }

    async fn list_users(&self, page: PageRequest) -> Result<Vec<User>, AppError> {
        let query = [
            ("skip", page.skip.to_string()),
            ("limit", page.limit.to_string()),
        ];
        self.get_json_query("/users/", &query).await
    }

    async fn user_parties(
        &self,
        user: UserId,
        active: Option<bool>,
    ) -> Result<Vec<Party>, AppError> {
        let mut query = Vec::new();
        if let Some(active) = active {
            query.push(("is_active", active.to_string()));
        }
        self.get_json_query(&format!("/users/{user}/parties"), &query)
            .await
    }

    async fn list_raids(&self) -> Result<Vec<Raid>, AppError> {
        self.get_json("/raids/").await
    }

    async fn current_raid(&self) -> Result<Raid, AppError> {
        let query = [("is_current", "true".to_owned())];
        let raids: Vec<Raid> = self.get_json_query("/raids/", &query).await?;
        raids
            .into_iter()
            .next()
            .ok_or_else(|| AppError::api(404, "no current raid is configured"))
    }

    async fn create_raid(&self, name: &str, patch_number: &str) -> Result<Raid, AppError> {
        let body = CreateRaidBody { name, patch_number };
        self.post_json("/raids/", &body).await
    }

    async fn list_jobs(&self, role: Option<Role>) -> Result<Vec<Job>, AppError> {
        let mut query = Vec::new();
        if let Some(role) = role.and_then(Role::as_str) {
            query.push(("role", role.to_owned()));
        }
        self.get_json_query("/jobs/", &query).await
    }

    async fn raid_items(&self, raid: RaidId, filter: ItemFilter) -> Result<Vec<Item>, AppError> {
        let query = item_filter_query(None, filter);
        self.get_json_query(&format!("/raids/{raid}/items"), &query)
            .await
    }

    async fn list_items(
        &self,
        raid: Option<RaidId>,
        filter: ItemFilter,
    ) -> Result<Vec<Item>, AppError> {
        let query = item_filter_query(raid, filter);
        self.get_json_query("/items/", &query).await
    }

    async fn list_parties(&self, filter: PartyFilter) -> Result<Vec<Party>, AppError> {
        let mut query = Vec::new();
        if let Some(active) = filter.active {
            query.push(("is_active", active.to_string()));
        }
        if filter.mine_only {
            query.push(("my_parties_only", "true".to_owned()));
        }
        self.get_json_query("/parties/", &query).await
    }

    async fn get_party(&self, party: PartyId) -> Result<Party, AppError> {
        self.get_json(&format!("/parties/{party}")).await
    }

    async fn create_party(
        &self,
        name: &str,
        raid: RaidId,
        method: DistributionMethod,
    ) -> Result<Party, AppError> {
        let body = CreatePartyBody {
            name,
            raid_id: raid,
            distribution_method: method,
        };
        self.post_json("/parties/", &body).await
    }

    async fn list_party_members(&self, party: PartyId) -> Result<Vec<PartyMember>, AppError> {
        self.get_json(&format!("/parties/{party}/members")).await
    }

    async fn available_jobs(&self, party: PartyId) -> Result<AvailableJobs, AppError> {
        self.get_json(&format!("/parties/{party}/jobs")).await
    }

    async fn join_party(
        &self,
        party: PartyId,
        job: JobId,
        character_name: &str,
    ) -> Result<PartyMemberId, AppError> {
        let body = JoinBody {
            job_id: job,
            character_name,
        };
        let receipt: JoinReceipt = self
            .post_json(&format!("/parties/{party}/members"), &body)
            .await?;
        Ok(receipt.party_member_id)
    }

    async fn leave_party(&self, party: PartyId) -> Result<(), AppError> {
        let user = self.identity().await?;
        self.delete(&format!("/parties/{party}/members/{user}")).await
    }

    async fn my_characters(&self) -> Result<Vec<UserCharacter>, AppError> {
        let user = self.identity().await?;
        self.user_characters(user).await
    }

    async fn user_characters(&self, user: UserId) -> Result<Vec<UserCharacter>, AppError> {
        self.get_json(&format!("/users/{user}/characters")).await
    }

    async fn equipment_set(
        &self,
        party: PartyId,
        user: UserId,
        kind: GearSetKind,
    ) -> Result<EquipmentSet, AppError> {
        let path = format!("/items/party/{party}/member/{user}/equipment");
        let query = [("set_type", kind.as_str().to_owned())];
        self.get_json_query(&path, &query).await
    }

    async fn update_equipment_set(
        &self,
        party: PartyId,
        user: UserId,
        kind: GearSetKind,
        choices: &[EquipmentChoice],
    ) -> Result<(), AppError> {
        // Unplanned slots are omitted; the backend replaces the whole set
        // with exactly the slots sent.
        let body = EquipmentBody {
            equipment: choices
                .iter()
                .filter_map(|choice| {
                    choice.item_id.map(|item_id| EquipmentWrite {
                        slot: choice.slot,
                        item_id,
                    })
                })
                .collect(),
        };
        let path = format!("/items/party/{party}/member/{user}/equipment");
        let request = self
            .http
            .put(self.url(&path))
            .query(&[("set_type", kind.as_str())])
            .json(&body);
        let (request, had_token) = self.authorize(request).await;
        self.execute(request, had_token).await?;
        Ok(())
    }

    async fn currency_requirements(
        &self,
        party: PartyId,
        user: UserId,
    ) -> Result<MemberCurrencyRequirements, AppError> {
        self.get_json(&format!(
            "/items/party/{party}/member/{user}/currency-requirements"
        ))
        .await
    }

    async fn priority_board(&self, party: PartyId) -> Result<PriorityBoard, AppError> {
        self.get_json(&format!("/distribution/party/{party}/priority-calculation"))
            .await
    }

    async fn list_distributions(
        &self,
        party: PartyId,
        filter: DistributionFilter,
    ) -> Result<Vec<Distribution>, AppError> {
        let mut query = Vec::new();
        if let Some(week) = filter.week_number {
            query.push(("week_number", week.to_string()));
        }
        if let Some(member) = filter.member {
            query.push(("party_member_id", member.to_string()));
        }
        self.get_json_query(&format!("/distribution/party/{party}"), &query)
            .await
    }

    async fn record_distribution(
        &self,
        party: PartyId,
        member: PartyMemberId,
        item: ItemId,
        week_number: u32,
        notes: Option<&str>,
    ) -> Result<DistributionId, AppError> {
        let body = DistributionBody {
            party_member_id: member,
            item_id: item,
            week_number,
            notes,
        };
        let receipt: DistributionReceipt = self
            .post_json(&format!("/distribution/party/{party}"), &body)
            .await?;
        Ok(receipt.distribution_id)
    }

    async fn delete_distribution(
        &self,
        party: PartyId,
        distribution: DistributionId,
    ) -> Result<(), AppError> {
        self.delete(&format!(
            "/distribution/party/{party}/distribution/{distribution}"
        ))
        .await
    }

    async fn list_schedules(&self, party: PartyId) -> Result<Vec<RaidSchedule>, AppError> {
        self.get_json(&format!("/distribution/party/{party}/schedule"))
            .await
    }

    async fn create_schedule(
        &self,
        party: PartyId,
        scheduled_date: DateTime<Utc>,
        notes: Option<&str>,
    ) -> Result<ScheduleId, AppError> {
        let body = ScheduleBody {
            scheduled_date,
            notes,
        };
        let receipt: ScheduleReceipt = self
            .post_json(&format!("/distribution/party/{party}/schedule"), &body)
            .await?;
        Ok(receipt.schedule_id)
    }

    async fn delete_schedule(
        &self,
        party: PartyId,
        schedule: ScheduleId,
    ) -> Result<(), AppError> {
        self.delete(&format!("/distribution/party/{party}/schedule/{schedule}"))
            .await
    }
}

fn item_filter_query(raid: Option<RaidId>, filter: ItemFilter) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(raid) = raid {
        query.push(("raid_id", raid.to_string()));
    }
    if let Some(slot) = filter.slot {
        query.push(("slot", slot.as_str().to_owned()));
    }
    if let Some(kind) = filter.kind {
        query.push(("item_type", kind.as_str().to_owned()));
    }
    query
}

// =========================================================================
// Wire shapes
// =========================================================================

#[derive(Deserialize)]
struct TokenPayload {
    access_token: String,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct CreateRaidBody<'a> {
    name: &'a str,
    patch_number: &'a str,
}

#[derive(Serialize)]
struct CreatePartyBody<'a> {
    name: &'a str,
    raid_id: RaidId,
    distribution_method: DistributionMethod,
}

#[derive(Serialize)]
struct JoinBody<'a> {
    job_id: JobId,
    character_name: &'a str,
}

#[derive(Deserialize)]
struct JoinReceipt {
    party_member_id: PartyMemberId,
}

#[derive(Serialize)]
struct EquipmentBody {
    equipment: Vec<EquipmentWrite>,
}

#[derive(Serialize)]
struct EquipmentWrite {
    slot: GearSlot,
    item_id: ItemId,
}

#[derive(Serialize)]
struct DistributionBody<'a> {
    party_member_id: PartyMemberId,
    item_id: ItemId,
    week_number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<&'a str>,
}

#[derive(Deserialize)]
struct DistributionReceipt {
    distribution_id: DistributionId,
}

#[derive(Serialize)]
struct ScheduleBody<'a> {
    scheduled_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<&'a str>,
}

#[derive(Deserialize)]
struct ScheduleReceipt {
    schedule_id: ScheduleId,
}

// =========================================================================
// Error classification
// =========================================================================

fn map_transport(error: reqwest::Error) -> AppError {
    if error.is_timeout() {
        AppError::network(NetworkErrorCode::Timeout, "request timed out")
    } else if error.is_connect() {
        AppError::network(
            NetworkErrorCode::ConnectionRefused,
            "could not reach the server",
        )
    } else if error.is_decode() {
        AppError::internal("response decoding", error.to_string())
    } else {
        AppError::network(NetworkErrorCode::Other, error.to_string())
    }
}

/// Turn a non-success response into the error the application layer acts
/// on. `had_token` tells an expired session apart from a failed login.
fn error_from_response(status: u16, body: &str, had_token: bool) -> AppError {
    let detail = extract_detail(body);
    match status {
        401 if had_token => AppError::auth(AuthFailure::TokenExpired, detail),
        401 => AppError::auth(AuthFailure::InvalidCredentials, detail),
        403 => AppError::auth(AuthFailure::InsufficientPermissions, detail),
        _ => AppError::api(status, detail),
    }
}

/// Pull the `detail` field out of an error body. The backend wraps every
/// failure in `{"detail": ...}`; validation failures carry a list there.
fn extract_detail(body: &str) -> String {
    #[derive(Deserialize)]
    struct Payload {
        detail: serde_json::Value,
    }
    match serde_json::from_str::<Payload>(body) {
        Ok(Payload {
            detail: serde_json::Value::String(text),
        }) => text,
        Ok(Payload { detail }) => detail.to_string(),
        Err(_) => {
            let text = body.trim();
            if text.is_empty() {
                "the server returned an error without a message".to_owned()
            } else {
                text.to_owned()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_bridge() -> (tempfile::TempDir, HttpServerBridge) {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::at(dir.path().join("token"));
        let bridge = HttpServerBridge::with_store(ClientConfig::default(), store).unwrap();
        (dir, bridge)
    }

    #[tokio::test]
    async fn test_fresh_bridge_has_no_credentials() {
        let (_dir, bridge) = temp_bridge();
        assert!(!bridge.has_credentials().await);
    }

    #[tokio::test]
    async fn test_bridge_picks_up_a_previously_stored_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::at(dir.path().join("token"));
        store.save("stored-token").unwrap();

        let bridge = HttpServerBridge::with_store(ClientConfig::default(), store).unwrap();
        assert!(bridge.has_credentials().await);

        bridge.discard_credentials().await.unwrap();
        assert!(!bridge.has_credentials().await);
        let reopened = TokenStore::at(dir.path().join("token"));
        assert_eq!(reopened.load().unwrap(), None);
    }

    #[test]
    fn test_base_url_loses_its_trailing_slash() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::at(dir.path().join("token"));
        let config = ClientConfig::default().with_base_url("http://localhost:8000/api/");
        let bridge = HttpServerBridge::with_store(config, store).unwrap();
        assert_eq!(bridge.url("/parties/"), "http://localhost:8000/api/parties/");
    }

    #[test]
    fn test_401_reads_differently_with_and_without_a_token() {
        let body = r#"{"detail": "Could not validate credentials"}"#;

        let with_token = error_from_response(401, body, true);
        assert_eq!(with_token.code(), "AUTH_EXPIRED");
        assert!(with_token.is_unauthenticated());

        let without_token = error_from_response(401, body, false);
        assert_eq!(without_token.code(), "AUTH_INVALID");
        assert!(!without_token.is_unauthenticated());
    }

    #[test]
    fn test_403_keeps_the_session() {
        let error = error_from_response(403, r#"{"detail": "관리자 권한이 필요합니다"}"#, true);
        assert_eq!(error.code(), "AUTH_PERMISSION");
        assert!(!error.is_unauthenticated());
    }

    #[test]
    fn test_api_errors_carry_the_backend_detail() {
        let error = error_from_response(400, r#"{"detail": "탱커 인원이 가득 찼습니다"}"#, true);
        assert_eq!(error.code(), "API_CLIENT");
        assert_eq!(error.user_message(), "탱커 인원이 가득 찼습니다");

        let error = error_from_response(500, "", true);
        assert_eq!(error.code(), "API_SERVER");
    }

    #[test]
    fn test_item_filter_query_includes_only_set_fields() {
        use raidloot_core::ItemKind;

        assert!(item_filter_query(None, ItemFilter::default()).is_empty());

        let filter = ItemFilter {
            slot: Some(GearSlot::Weapon),
            kind: Some(ItemKind::SavageRaid),
        };
        assert_eq!(
            item_filter_query(Some(RaidId::from(3)), filter),
            vec![
                ("raid_id", "3".to_owned()),
                ("slot", "weapon".to_owned()),
                ("item_type", "savage_raid".to_owned()),
            ]
        );
    }

    #[test]
    fn test_detail_extraction_survives_odd_bodies() {
        assert_eq!(extract_detail(r#"{"detail": "plain"}"#), "plain");
        assert_eq!(
            extract_detail(r#"{"detail": [{"loc": ["body"], "msg": "field required"}]}"#),
            r#"[{"loc":["body"],"msg":"field required"}]"#
        );
        assert_eq!(extract_detail("not json"), "not json");
        assert_eq!(
            extract_detail("  "),
            "the server returned an error without a message"
        );
    }
}
