//! # AppCore: The Shared Application Facade
//!
//! One [`AppCore`] per running client wires the pieces together: the
//! server bridge it was given, the process-wide [`Session`], and the
//! [`Notifications`] queue. Shells build their per-view [`Resource`]s and
//! [`Action`]s through it so that every backend failure flows through the
//! same policy. In particular, any operation failing with an expired or
//! missing token invalidates the session, exactly once, no matter which
//! view triggered it.
//!
//! ```rust,ignore
//! let core = AppCore::new(Arc::new(HttpServerBridge::new(config)?));
//! core.start().await;                       // resolve stored credentials
//!
//! let parties = core.parties();             // Resource<Vec<Party>, PartyFilter>
//! parties.observe(PartyFilter::default());
//!
//! let join = core.action();                 // Action with session hook
//! ```

use std::future::Future;
use std::sync::Arc;

use raidloot_core::{
    AvailableJobs, Distribution, EquipmentSet, GearSetKind, Item, Job,
    MemberCurrencyRequirements, Party, PartyId, PartyMember, PriorityBoard, Raid, RaidId,
    RaidSchedule, Role, User, UserCharacter, UserId,
};

use crate::action::Action;
use crate::errors::AppError;
use crate::notifications::Notifications;
use crate::resource::Resource;
use crate::server_bridge::{
    BoxedServerBridge, DistributionFilter, ItemFilter, OfflineServerBridge, PageRequest,
    PartyFilter,
};
use crate::session::Session;

/// The shared application facade.
pub struct AppCore {
    bridge: BoxedServerBridge,
    session: Arc<Session>,
    notifications: Arc<Notifications>,
}

impl AppCore {
    /// Create a core around a server bridge.
    ///
    /// The session starts in its initializing phase; call
    /// [`AppCore::start`] once the shell is ready to resolve stored
    /// credentials.
    #[must_use]
    pub fn new(bridge: BoxedServerBridge) -> Self {
        let session = Arc::new(Session::new(bridge.clone()));
        Self {
            bridge,
            session,
            notifications: Arc::new(Notifications::new()),
        }
    }

    /// A core with no backend at all, for demos and tests.
    #[must_use]
    pub fn offline() -> Self {
        Self::new(Arc::new(OfflineServerBridge::new()))
    }

    /// Resolve stored credentials into a settled session phase. Run once
    /// at startup, before the first guarded route renders.
    pub async fn start(&self) {
        self.session.resolve().await;
    }

    /// The server bridge this core talks through.
    #[must_use]
    pub fn bridge(&self) -> &BoxedServerBridge {
        &self.bridge
    }

    /// The process-wide session.
    #[must_use]
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// The shared toast queue.
    #[must_use]
    pub fn notifications(&self) -> &Arc<Notifications> {
        &self.notifications
    }

    /// An action wired to the shared toast queue and session.
    #[must_use]
    pub fn action(&self) -> Action {
        Action::with_session(self.notifications.clone(), self.session.clone())
    }

    /// Build a resource whose failures participate in session policy:
    /// a load that fails because the stored token is no longer accepted
    /// invalidates the session before the error lands in the resource.
    pub fn resource<T, D, F, Fut>(&self, producer: F) -> Resource<T, D>
    where
        T: Clone + Send + Sync + 'static,
        D: Clone + PartialEq + Send + 'static,
        F: Fn(D) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, AppError>> + Send + 'static,
    {
        let session = self.session.clone();
        Resource::new(move |deps: D| {
            let future = producer(deps);
            let session = session.clone();
            async move {
                match future.await {
                    Err(error) if error.is_unauthenticated() => {
                        session.invalidate().await;
                        Err(error)
                    }
                    other => other,
                }
            }
        })
    }

    // =========================================================================
    // Read catalog
    //
    // One builder per backend read. Dependency-less reads use `()`;
    // the rest key on the record id so navigating between, say, two
    // parties refetches through the same resource.
    // =========================================================================

    /// All raid tiers.
    #[must_use]
    pub fn raids(&self) -> Resource<Vec<Raid>> {
        let bridge = self.bridge.clone();
        self.resource(move |()| {
            let bridge = bridge.clone();
            async move { bridge.list_raids().await }
        })
    }

    /// The live raid tier.
    #[must_use]
    pub fn current_raid(&self) -> Resource<Raid> {
        let bridge = self.bridge.clone();
        self.resource(move |()| {
            let bridge = bridge.clone();
            async move { bridge.current_raid().await }
        })
    }

    /// Playable jobs, keyed by an optional role filter.
    #[must_use]
    pub fn jobs(&self) -> Resource<Vec<Job>, Option<Role>> {
        let bridge = self.bridge.clone();
        self.resource(move |role| {
            let bridge = bridge.clone();
            async move { bridge.list_jobs(role).await }
        })
    }

    /// Items of the observed raid tier, keyed by tier and filter so that
    /// changing either refetches.
    #[must_use]
    pub fn items(&self) -> Resource<Vec<Item>, (RaidId, ItemFilter)> {
        let bridge = self.bridge.clone();
        self.resource(move |(raid, filter)| {
            let bridge = bridge.clone();
            async move { bridge.raid_items(raid, filter).await }
        })
    }

    /// The whole item catalog, for the admin dashboard.
    #[must_use]
    pub fn item_catalog(&self) -> Resource<Vec<Item>, (Option<RaidId>, ItemFilter)> {
        let bridge = self.bridge.clone();
        self.resource(move |(raid, filter)| {
            let bridge = bridge.clone();
            async move { bridge.list_items(raid, filter).await }
        })
    }

    /// Visible parties, keyed by the list filter.
    #[must_use]
    pub fn parties(&self) -> Resource<Vec<Party>, PartyFilter> {
        let bridge = self.bridge.clone();
        self.resource(move |filter| {
            let bridge = bridge.clone();
            async move { bridge.list_parties(filter).await }
        })
    }

    /// The observed party.
    #[must_use]
    pub fn party(&self) -> Resource<Party, PartyId> {
        let bridge = self.bridge.clone();
        self.resource(move |party| {
            let bridge = bridge.clone();
            async move { bridge.get_party(party).await }
        })
    }

    /// Members of the observed party.
    #[must_use]
    pub fn party_members(&self) -> Resource<Vec<PartyMember>, PartyId> {
        let bridge = self.bridge.clone();
        self.resource(move |party| {
            let bridge = bridge.clone();
            async move { bridge.list_party_members(party).await }
        })
    }

    /// Open jobs and current composition of the observed party.
    #[must_use]
    pub fn available_jobs(&self) -> Resource<AvailableJobs, PartyId> {
        let bridge = self.bridge.clone();
        self.resource(move |party| {
            let bridge = bridge.clone();
            async move { bridge.available_jobs(party).await }
        })
    }

    /// The logged-in user's characters.
    #[must_use]
    pub fn my_characters(&self) -> Resource<Vec<UserCharacter>> {
        let bridge = self.bridge.clone();
        self.resource(move |()| {
            let bridge = bridge.clone();
            async move { bridge.my_characters().await }
        })
    }

    /// Characters of the observed account, for the admin user detail.
    #[must_use]
    pub fn user_characters(&self) -> Resource<Vec<UserCharacter>, UserId> {
        let bridge = self.bridge.clone();
        self.resource(move |user| {
            let bridge = bridge.clone();
            async move { bridge.user_characters(user).await }
        })
    }

    /// Registered accounts, keyed by page window. Admin only.
    #[must_use]
    pub fn users(&self) -> Resource<Vec<User>, PageRequest> {
        let bridge = self.bridge.clone();
        self.resource(move |page| {
            let bridge = bridge.clone();
            async move { bridge.list_users(page).await }
        })
    }

    /// Parties of the observed account, keyed by account and activity
    /// filter.
    #[must_use]
    pub fn user_parties(&self) -> Resource<Vec<Party>, (UserId, Option<bool>)> {
        let bridge = self.bridge.clone();
        self.resource(move |(user, active)| {
            let bridge = bridge.clone();
            async move { bridge.user_parties(user, active).await }
        })
    }

    /// The observed gear set. Keyed by member and set kind, so switching
    /// between the current/start/final tabs refetches through the same
    /// resource.
    #[must_use]
    pub fn equipment_set(&self) -> Resource<EquipmentSet, (PartyId, UserId, GearSetKind)> {
        let bridge = self.bridge.clone();
        self.resource(move |(party, user, kind)| {
            let bridge = bridge.clone();
            async move { bridge.equipment_set(party, user, kind).await }
        })
    }

    /// Upgrade costs of the observed member.
    #[must_use]
    pub fn currency_requirements(
        &self,
    ) -> Resource<MemberCurrencyRequirements, (PartyId, UserId)> {
        let bridge = self.bridge.clone();
        self.resource(move |(party, user)| {
            let bridge = bridge.clone();
            async move { bridge.currency_requirements(party, user).await }
        })
    }

    /// Priority board of the observed party.
    #[must_use]
    pub fn priority_board(&self) -> Resource<PriorityBoard, PartyId> {
        let bridge = self.bridge.clone();
        self.resource(move |party| {
            let bridge = bridge.clone();
            async move { bridge.priority_board(party).await }
        })
    }

    /// Distribution history of the observed party, keyed by party and
    /// history filter.
    #[must_use]
    pub fn distributions(&self) -> Resource<Vec<Distribution>, (PartyId, DistributionFilter)> {
        let bridge = self.bridge.clone();
        self.resource(move |(party, filter)| {
            let bridge = bridge.clone();
            async move { bridge.list_distributions(party, filter).await }
        })
    }

    /// Sessions of the observed party.
    #[must_use]
    pub fn schedules(&self) -> Resource<Vec<RaidSchedule>, PartyId> {
        let bridge = self.bridge.clone();
        self.resource(move |party| {
            let bridge = bridge.clone();
            async move { bridge.list_schedules(party).await }
        })
    }
}
