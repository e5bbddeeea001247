//! Service scenarios against a real Postgres. Each test runs inside a test
//! transaction that is rolled back, so the database is left untouched.
//! Run with `TEST_DATABASE_URL=... cargo test -- --ignored`.

mod changelog;
mod feedback;
mod roadmap;
mod workspaces;

use diesel::{Connection, PgConnection};
use tokio::sync::mpsc::UnboundedReceiver;
use urpeer_backend::db::models::{CreateWorkspaceRequest, OnboardingResult};
use urpeer_backend::middleware::SessionUser;
use urpeer_backend::notifications::{Notification, NotificationDispatcher};
use urpeer_backend::services::WorkspacesService;
use urpeer_backend::services::context::RequestContext;
use uuid::Uuid;

pub fn connect() -> PgConnection {
    let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set");
    let mut conn = PgConnection::establish(&url).expect("Failed to connect to test database");
    conn.begin_test_transaction()
        .expect("Failed to begin test transaction");
    conn
}

pub fn session_user(name: &str) -> SessionUser {
    SessionUser {
        id: Uuid::new_v4(),
        email: format!("{}@example.com", name.to_lowercase()),
        full_name: Some(name.to_string()),
    }
}

pub fn unique_slug() -> String {
    format!("ws-{}", &Uuid::new_v4().simple().to_string()[..10])
}

pub struct Tenant {
    pub admin: SessionUser,
    pub onboarding: OnboardingResult,
    pub notifier: NotificationDispatcher,
    pub outbox: UnboundedReceiver<Notification>,
}

impl Tenant {
    pub fn workspace_id(&self) -> Uuid {
        self.onboarding.workspace.id
    }

    pub fn slug(&self) -> &str {
        &self.onboarding.workspace.slug
    }

    pub fn admin_ctx(&self, conn: &mut PgConnection) -> RequestContext {
        RequestContext::load(conn, &self.admin).unwrap()
    }

    /// A fresh profile that joins this workspace as a voter.
    pub fn voter(&self, conn: &mut PgConnection, name: &str) -> (SessionUser, RequestContext) {
        let user = session_user(name);
        WorkspacesService::join(conn, &user, self.slug(), &self.notifier).unwrap();
        let ctx = RequestContext::load(conn, &user).unwrap();
        (user, ctx)
    }

    pub fn drain_outbox(&mut self) -> Vec<Notification> {
        let mut sent = Vec::new();
        while let Ok(notification) = self.outbox.try_recv() {
            sent.push(notification);
        }
        sent
    }
}

pub fn tenant(conn: &mut PgConnection) -> Tenant {
    let (notifier, outbox) = NotificationDispatcher::channel();
    let admin = session_user("Owner");
    let request = CreateWorkspaceRequest {
        name: "Acme".into(),
        slug: unique_slug(),
        website: Some("https://acme.example".into()),
    };
    let onboarding = WorkspacesService::create(conn, &admin, &request, &notifier).unwrap();
    let mut tenant = Tenant {
        admin,
        onboarding,
        notifier,
        outbox,
    };
    tenant.drain_outbox();
    tenant
}
