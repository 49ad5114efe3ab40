//! Session lifecycle against a scripted backend.
//!
//! The in-module session tests cover the offline paths; these exercise the
//! full flow with a bridge that actually stores and rejects tokens:
//! startup restoration, login round trips, route guarding, and the
//! invalidation path where a mid-session token rejection signs the user
//! out from wherever it happens.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use assert_matches::assert_matches;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use futures::StreamExt;
use futures_signals::signal::SignalExt;
use parking_lot::Mutex;

use raidloot_app::{
    Action, ActionOptions, AppCore, AppError, AuthFailure, BoxedServerBridge, DistributionFilter,
    GuardDecision, ItemFilter, PageRequest, PartyFilter, ServerBridge, Session, SessionEvent,
    SessionPhase,
};
use raidloot_core::{
    AvailableJobs, Distribution, DistributionId, DistributionMethod, EquipmentChoice,
    EquipmentSet, GearSetKind, Item, ItemId, Job, JobId, MemberCurrencyRequirements, Party,
    PartyId, PartyMember, PartyMemberId, PriorityBoard, Raid, RaidId, RaidSchedule, Role,
    ScheduleId, User, UserCharacter, UserId,
};

// =========================================================================
// Scripted bridge
// =========================================================================

const GOOD_PASSWORD: &str = "hunter22";

fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 20, 0, 0).single().unwrap()
}

fn stub_user(is_admin: bool) -> User {
    User {
        id: UserId::from(7),
        username: "ahri".to_owned(),
        email: "ahri@example.com".to_owned(),
        is_active: true,
        is_admin,
        created_at: fixed_time(),
    }
}

fn sample_party() -> Party {
    Party {
        id: PartyId::from(4),
        name: "고정팟 A".to_owned(),
        raid_id: RaidId::from(1),
        distribution_method: DistributionMethod::Priority,
        leader_id: UserId::from(7),
        is_active: true,
        created_at: fixed_time(),
        raid: None,
        member_count: Some(6),
    }
}

/// A backend double that stores one token and can be told to start
/// rejecting it, mimicking server-side expiry.
struct StubBridge {
    user: User,
    token: Mutex<Option<String>>,
    rejecting: AtomicBool,
    discards: AtomicUsize,
}

impl StubBridge {
    fn anonymous() -> Arc<Self> {
        Arc::new(Self {
            user: stub_user(false),
            token: Mutex::new(None),
            rejecting: AtomicBool::new(false),
            discards: AtomicUsize::new(0),
        })
    }

    fn with_stored_token(is_admin: bool) -> Arc<Self> {
        Arc::new(Self {
            user: stub_user(is_admin),
            token: Mutex::new(Some("stored-token".to_owned())),
            rejecting: AtomicBool::new(false),
            discards: AtomicUsize::new(0),
        })
    }

    /// From now on, every token-bearing request fails as expired.
    fn start_rejecting_tokens(&self) {
        self.rejecting.store(true, Ordering::SeqCst);
    }

    fn discard_count(&self) -> usize {
        self.discards.load(Ordering::SeqCst)
    }

    /// The gate every authenticated endpoint passes through.
    fn check_token(&self) -> Result<(), AppError> {
        if self.token.lock().is_none() {
            return Err(AppError::auth(AuthFailure::TokenMissing, "no stored token"));
        }
        if self.rejecting.load(Ordering::SeqCst) {
            return Err(AppError::auth(
                AuthFailure::TokenExpired,
                "token no longer accepted",
            ));
        }
        Ok(())
    }

    fn unscripted(what: &str) -> AppError {
        AppError::internal("stub bridge", format!("{what} not scripted"))
    }
}

#[async_trait]
impl ServerBridge for StubBridge {
    async fn login(&self, username: &str, password: &str) -> Result<(), AppError> {
        if username == self.user.username && password == GOOD_PASSWORD {
            *self.token.lock() = Some("fresh-token".to_owned());
            Ok(())
        } else {
            Err(AppError::auth(
                AuthFailure::InvalidCredentials,
                "username or password incorrect",
            ))
        }
    }

    async fn register(
        &self,
        _username: &str,
        _email: &str,
        _password: &str,
    ) -> Result<User, AppError> {
        Err(Self::unscripted("register"))
    }

    async fn current_user(&self) -> Result<User, AppError> {
        self.check_token()?;
        Ok(self.user.clone())
    }

    async fn change_password(&self, _current: &str, _new: &str) -> Result<(), AppError> {
        Err(Self::unscripted("change_password"))
    }

    async fn has_credentials(&self) -> bool {
        self.token.lock().is_some()
    }

    async fn discard_credentials(&self) -> Result<(), AppError> {
        *self.token.lock() = None;
        self.discards.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn list_users(&self, _page: PageRequest) -> Result<Vec<User>, AppError> {
        Err(Self::unscripted("list_users"))
    }

    async fn user_parties(
        &self,
        _user: UserId,
        _active: Option<bool>,
    ) -> Result<Vec<Party>, AppError> {
        Err(Self::unscripted("user_parties"))
    }

    async fn list_raids(&self) -> Result<Vec<Raid>, AppError> {
        Err(Self::unscripted("list_raids"))
    }

    async fn current_raid(&self) -> Result<Raid, AppError> {
        Err(Self::unscripted("current_raid"))
    }

    async fn create_raid(&self, _name: &str, _patch_number: &str) -> Result<Raid, AppError> {
        Err(Self::unscripted("create_raid"))
    }

    async fn list_jobs(&self, _role: Option<Role>) -> Result<Vec<Job>, AppError> {
        Err(Self::unscripted("list_jobs"))
    }

    async fn raid_items(&self, _raid: RaidId, _filter: ItemFilter) -> Result<Vec<Item>, AppError> {
        Err(Self::unscripted("raid_items"))
    }

    async fn list_items(
        &self,
        _raid: Option<RaidId>,
        _filter: ItemFilter,
    ) -> Result<Vec<Item>, AppError> {
        Err(Self::unscripted("list_items"))
    }

    async fn list_parties(&self, _filter: PartyFilter) -> Result<Vec<Party>, AppError> {
        self.check_token()?;
        Ok(vec![sample_party()])
    }

    async fn get_party(&self, _party: PartyId) -> Result<Party, AppError> {
        Err(Self::unscripted("get_party"))
    }

    async fn create_party(
        &self,
        _name: &str,
        _raid: RaidId,
        _method: DistributionMethod,
    ) -> Result<Party, AppError> {
        Err(Self::unscripted("create_party"))
    }

    async fn list_party_members(&self, _party: PartyId) -> Result<Vec<PartyMember>, AppError> {
        Err(Self::unscripted("list_party_members"))
    }

    async fn available_jobs(&self, _party: PartyId) -> Result<AvailableJobs, AppError> {
        Err(Self::unscripted("available_jobs"))
    }

    async fn join_party(
        &self,
        _party: PartyId,
        _job: JobId,
        _character_name: &str,
    ) -> Result<PartyMemberId, AppError> {
        self.check_token()?;
        Ok(PartyMemberId::from(99))
    }

    async fn leave_party(&self, _party: PartyId) -> Result<(), AppError> {
        Err(Self::unscripted("leave_party"))
    }

    async fn my_characters(&self) -> Result<Vec<UserCharacter>, AppError> {
        Err(Self::unscripted("my_characters"))
    }

    async fn user_characters(&self, _user: UserId) -> Result<Vec<UserCharacter>, AppError> {
        Err(Self::unscripted("user_characters"))
    }

    async fn equipment_set(
        &self,
        _party: PartyId,
        _user: UserId,
        _kind: GearSetKind,
    ) -> Result<EquipmentSet, AppError> {
        Err(Self::unscripted("equipment_set"))
    }

    async fn update_equipment_set(
        &self,
        _party: PartyId,
        _user: UserId,
        _kind: GearSetKind,
        _choices: &[EquipmentChoice],
    ) -> Result<(), AppError> {
        Err(Self::unscripted("update_equipment_set"))
    }

    async fn currency_requirements(
        &self,
        _party: PartyId,
        _user: UserId,
    ) -> Result<MemberCurrencyRequirements, AppError> {
        Err(Self::unscripted("currency_requirements"))
    }

    async fn priority_board(&self, _party: PartyId) -> Result<PriorityBoard, AppError> {
        Err(Self::unscripted("priority_board"))
    }

    async fn list_distributions(
        &self,
        _party: PartyId,
        _filter: DistributionFilter,
    ) -> Result<Vec<Distribution>, AppError> {
        Err(Self::unscripted("list_distributions"))
    }

    async fn record_distribution(
        &self,
        _party: PartyId,
        _member: PartyMemberId,
        _item: ItemId,
        _week_number: u32,
        _notes: Option<&str>,
    ) -> Result<DistributionId, AppError> {
        Err(Self::unscripted("record_distribution"))
    }

    async fn delete_distribution(
        &self,
        _party: PartyId,
        _distribution: DistributionId,
    ) -> Result<(), AppError> {
        Err(Self::unscripted("delete_distribution"))
    }

    async fn list_schedules(&self, _party: PartyId) -> Result<Vec<RaidSchedule>, AppError> {
        Err(Self::unscripted("list_schedules"))
    }

    async fn create_schedule(
        &self,
        _party: PartyId,
        _scheduled_date: DateTime<Utc>,
        _notes: Option<&str>,
    ) -> Result<ScheduleId, AppError> {
        Err(Self::unscripted("create_schedule"))
    }

    async fn delete_schedule(
        &self,
        _party: PartyId,
        _schedule: ScheduleId,
    ) -> Result<(), AppError> {
        Err(Self::unscripted("delete_schedule"))
    }
}

// =========================================================================
// Startup resolution
// =========================================================================

#[tokio::test]
async fn test_startup_restores_a_stored_session() {
    let stub = StubBridge::with_stored_token(false);
    let bridge: BoxedServerBridge = stub.clone();
    let session = Session::new(bridge);
    let mut events = session.subscribe();

    session.resolve().await;

    assert_eq!(session.phase(), SessionPhase::Authenticated);
    assert_eq!(
        session.current_user().map(|u| u.username),
        Some("ahri".to_owned())
    );
    assert_matches!(events.try_recv(), Ok(SessionEvent::SignedIn(user)) if user.username == "ahri");
}

#[tokio::test]
async fn test_startup_discards_a_rejected_token() {
    let stub = StubBridge::with_stored_token(false);
    stub.start_rejecting_tokens();
    let bridge: BoxedServerBridge = stub.clone();
    let session = Session::new(bridge);
    let mut events = session.subscribe();

    session.resolve().await;

    assert_eq!(session.phase(), SessionPhase::Anonymous);
    assert!(!stub.has_credentials().await);
    assert_eq!(stub.discard_count(), 1);
    // A rejected stored token is routine, not an announced sign-out.
    assert!(events.try_recv().is_err());
}

// =========================================================================
// Login and logout
// =========================================================================

#[tokio::test]
async fn test_login_settles_authenticated_and_announces() {
    let stub = StubBridge::anonymous();
    let bridge: BoxedServerBridge = stub.clone();
    let session = Session::new(bridge);
    session.resolve().await;
    let mut events = session.subscribe();

    let user = session.login("ahri", GOOD_PASSWORD).await.unwrap();

    assert_eq!(user.username, "ahri");
    assert_eq!(session.phase(), SessionPhase::Authenticated);
    assert!(stub.has_credentials().await);
    assert_matches!(events.try_recv(), Ok(SessionEvent::SignedIn(_)));
}

#[tokio::test]
async fn test_login_with_wrong_password_propagates_and_stays_anonymous() {
    let stub = StubBridge::anonymous();
    let bridge: BoxedServerBridge = stub.clone();
    let session = Session::new(bridge);
    session.resolve().await;

    let error = session.login("ahri", "wrong").await.unwrap_err();

    assert_eq!(error.code(), "AUTH_INVALID");
    assert!(!error.is_unauthenticated());
    assert_eq!(session.phase(), SessionPhase::Anonymous);
    assert!(!stub.has_credentials().await);
}

#[tokio::test]
async fn test_failed_identity_fetch_after_login_discards_the_token() {
    let stub = StubBridge::anonymous();
    let bridge: BoxedServerBridge = stub.clone();
    let session = Session::new(bridge);
    session.resolve().await;

    // The password is accepted and a token stored, but the identity fetch
    // behind it fails; a half-open session must not survive that.
    stub.start_rejecting_tokens();
    let error = session.login("ahri", GOOD_PASSWORD).await.unwrap_err();

    assert_eq!(error.code(), "AUTH_EXPIRED");
    assert_eq!(session.phase(), SessionPhase::Anonymous);
    assert!(!stub.has_credentials().await);
}

#[tokio::test]
async fn test_logout_discards_the_token_and_announces() {
    let stub = StubBridge::with_stored_token(false);
    let bridge: BoxedServerBridge = stub.clone();
    let session = Session::new(bridge);
    session.resolve().await;
    let mut events = session.subscribe();

    session.logout().await;

    assert_eq!(session.phase(), SessionPhase::Anonymous);
    assert!(!stub.has_credentials().await);
    assert_matches!(events.try_recv(), Ok(SessionEvent::SignedOut));
}

// =========================================================================
// Route guarding
// =========================================================================

#[tokio::test]
async fn test_member_guard_grants_plain_routes_and_bounces_admin_ones() {
    let stub = StubBridge::with_stored_token(false);
    let bridge: BoxedServerBridge = stub.clone();
    let session = Session::new(bridge);
    session.resolve().await;

    assert_eq!(session.guard(None, false), GuardDecision::Grant);
    assert_eq!(session.guard(Some("/admin"), true), GuardDecision::RedirectHome);
}

#[tokio::test]
async fn test_admin_guard_grants_admin_routes() {
    let stub = StubBridge::with_stored_token(true);
    let bridge: BoxedServerBridge = stub.clone();
    let session = Session::new(bridge);
    session.resolve().await;

    assert_eq!(session.guard(None, true), GuardDecision::Grant);
    assert!(session.is_admin());
}

// =========================================================================
// Mid-session token rejection
// =========================================================================

async fn settled_parties_state(
    parties: &raidloot_app::Resource<Vec<Party>, PartyFilter>,
) -> raidloot_app::ResourceState<Vec<Party>> {
    let mut stream = parties.signal().to_stream();
    loop {
        match stream.next().await {
            Some(state) if state.is_settled() => break state,
            Some(_) => {}
            None => panic!("resource signal ended"),
        }
    }
}

#[tokio::test]
async fn test_resource_token_rejection_invalidates_the_session() {
    let stub = StubBridge::with_stored_token(false);
    let bridge: BoxedServerBridge = stub.clone();
    let core = AppCore::new(bridge);
    core.start().await;
    assert_eq!(core.session().phase(), SessionPhase::Authenticated);
    let mut events = core.session().subscribe();

    // Works while the token holds.
    let parties = core.parties();
    parties.observe(PartyFilter::default());
    let state = settled_parties_state(&parties).await;
    assert_eq!(state.data.as_ref().map(Vec::len), Some(1));

    // Token dies server-side; the next load signs the user out.
    stub.start_rejecting_tokens();
    parties.reload();
    let state = settled_parties_state(&parties).await;

    assert_eq!(state.error.map(|e| e.code()), Some("AUTH_EXPIRED"));
    // Stale-but-valid data is kept for the redraw during the redirect.
    assert_eq!(state.data.map(|p| p.len()), Some(1));
    assert_eq!(core.session().phase(), SessionPhase::Anonymous);
    assert!(!stub.has_credentials().await);
    assert_matches!(events.try_recv(), Ok(SessionEvent::Invalidated));
}

#[tokio::test]
async fn test_action_token_rejection_invalidates_without_a_toast() {
    let stub = StubBridge::with_stored_token(false);
    let bridge: BoxedServerBridge = stub.clone();
    let core = AppCore::new(bridge);
    core.start().await;
    let mut events = core.session().subscribe();

    stub.start_rejecting_tokens();
    let action: Action = core.action();
    let result = action
        .run(
            stub.join_party(PartyId::from(4), JobId::from(2), "아리"),
            ActionOptions::<PartyMemberId>::new().with_error_message("Could not join the party"),
        )
        .await;

    assert_matches!(result, Err(error) if error.code() == "AUTH_EXPIRED");
    assert_eq!(core.session().phase(), SessionPhase::Anonymous);
    assert_matches!(events.try_recv(), Ok(SessionEvent::Invalidated));
    // The redirect is the user-visible outcome; no expired-session toast.
    assert!(core.notifications().snapshot().is_empty());
}

#[tokio::test]
async fn test_concurrent_rejections_invalidate_once() {
    let stub = StubBridge::with_stored_token(false);
    let bridge: BoxedServerBridge = stub.clone();
    let session = Arc::new(Session::new(bridge));
    session.resolve().await;
    let mut events = session.subscribe();

    stub.start_rejecting_tokens();
    session.invalidate().await;
    session.invalidate().await;

    assert_matches!(events.try_recv(), Ok(SessionEvent::Invalidated));
    assert!(events.try_recv().is_err());
    assert_eq!(session.phase(), SessionPhase::Anonymous);
}
