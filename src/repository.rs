use crate::models::{
    AdminStats, AdminUser, ConsultationRequest, ContactMessage, CreateConsultationRequest,
    CreateContactRequest, NewsletterSubscriber, Service, ServiceRequest,
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, query_builder::QueryBuilder};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Repository
///
/// Persistence seam for the whole API. Handlers only ever see this trait,
/// which is what lets the test suites swap Postgres for the in-memory
/// variant without touching handler code. `Send + Sync` (plus async_trait)
/// keep the `Arc<dyn Repository>` usable from any tokio worker.
///
/// Failure shapes follow one convention: list methods return an empty `Vec`,
/// lookups and writes that target one row return `Option`/`bool`, and the bulk
/// delete reports the affected row count. Database errors are logged at the
/// call site inside the implementation and collapsed into those shapes.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Services ---
    // Public listing in insertion order. `search` is a case-insensitive substring
    // match against the title or any single feature; `main_page_only` restricts
    // the result to the public pricing section.
    async fn list_services(&self, search: Option<String>, main_page_only: bool) -> Vec<Service>;
    async fn get_service(&self, id: Uuid) -> Option<Service>;
    // Write operations return None when the row could not be stored (or, for
    // updates and toggles, when the id does not exist).
    async fn create_service(&self, req: ServiceRequest) -> Option<Service>;
    async fn update_service(&self, id: Uuid, req: ServiceRequest) -> Option<Service>;
    async fn toggle_service_visibility(&self, id: Uuid) -> Option<Service>;
    async fn toggle_service_popular(&self, id: Uuid) -> Option<Service>;
    async fn delete_service(&self, id: Uuid) -> bool;

    // --- Contact Messages ---
    async fn create_contact(&self, req: CreateContactRequest) -> Option<ContactMessage>;
    // Admin inbox, newest first. `search` matches sender name or email.
    async fn list_contacts(&self, search: Option<String>) -> Vec<ContactMessage>;
    async fn toggle_contact_seen(&self, id: Uuid) -> Option<ContactMessage>;
    async fn delete_contact(&self, id: Uuid) -> bool;

    // --- Consultation Requests ---
    async fn create_consultation(
        &self,
        req: CreateConsultationRequest,
    ) -> Option<ConsultationRequest>;
    // Admin inbox, newest first. `search` matches the lead's full name or email.
    async fn list_consultations(&self, search: Option<String>) -> Vec<ConsultationRequest>;
    async fn toggle_consultation_seen(&self, id: Uuid) -> Option<ConsultationRequest>;
    async fn delete_consultation(&self, id: Uuid) -> bool;

    // --- Newsletter Subscribers ---
    // Idempotent insert keyed on the unique email index: returns None when the
    // address is already subscribed, so the handler can answer 409.
    async fn subscribe(&self, email: String) -> Option<NewsletterSubscriber>;
    async fn list_subscribers(&self, search: Option<String>) -> Vec<NewsletterSubscriber>;
    async fn delete_subscriber(&self, id: Uuid) -> bool;
    // Bulk deletion, wired for newsletters only. Returns the number of rows removed.
    async fn delete_subscribers(&self, ids: Vec<Uuid>) -> u64;

    // --- Admin Accounts ---
    async fn get_admin(&self, id: Uuid) -> Option<AdminUser>;
    async fn get_admin_by_email(&self, email: String) -> Option<AdminUser>;
    async fn count_admins(&self) -> i64;
    async fn create_admin(
        &self,
        email: String,
        password_hash: String,
        role: String,
    ) -> Option<AdminUser>;

    // --- Dashboard ---
    async fn get_stats(&self) -> AdminStats;
}

/// What the application state actually stores and clones per request.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// Production persistence: every trait method maps to one SQL statement
/// against the pool.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Column list shared by every service query so RETURNING and SELECT stay in step.
const SERVICE_COLUMNS: &str = "id, title, features, price, monthly_price, button_label, \
     popular, show_on_main_page, created_at, updated_at";

const CONTACT_COLUMNS: &str = "id, name, email, message, seen, received_at";

const CONSULTATION_COLUMNS: &str = "id, full_name, email, phone, company, project_type, \
     other_project_type, timeline, description, seen, created_at";

#[async_trait]
impl Repository for PostgresRepository {
    /// list_services
    ///
    /// Implements flexible search/filtering using QueryBuilder for safe parameterization.
    /// The feature match expands the TEXT[] column with `unnest` so a single
    /// matching bullet point is enough to include the service.
    async fn list_services(&self, search: Option<String>, main_page_only: bool) -> Vec<Service> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(format!(
            // 'WHERE true' anchors the clause so both filters can be appended uniformly.
            "SELECT {SERVICE_COLUMNS} FROM services WHERE true"
        ));

        if main_page_only {
            builder.push(" AND show_on_main_page = true");
        }

        if let Some(s) = search {
            let pattern = format!("%{}%", s);
            builder.push(" AND (title ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR EXISTS (SELECT 1 FROM unnest(features) AS feature WHERE feature ILIKE ");
            builder.push_bind(pattern);
            builder.push("))");
        }

        // Insertion order: the pricing grid renders cards oldest-first.
        builder.push(" ORDER BY created_at ASC");

        let query = builder.build_query_as::<Service>();

        match query.fetch_all(&self.pool).await {
            Ok(services) => services,
            Err(e) => {
                tracing::error!("list_services error: {:?}", e);
                vec![]
            }
        }
    }

    async fn get_service(&self, id: Uuid) -> Option<Service> {
        sqlx::query_as::<_, Service>(&format!(
            "SELECT {SERVICE_COLUMNS} FROM services WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_service error: {:?}", e);
            None
        })
    }

    /// create_service
    ///
    /// Inserts a new service and returns the stored row. The caller is expected
    /// to have validated and normalized the payload (trimmed features, no empties).
    async fn create_service(&self, req: ServiceRequest) -> Option<Service> {
        let new_id = Uuid::new_v4();
        let result = sqlx::query_as::<_, Service>(&format!(
            "INSERT INTO services \
                 (id, title, features, price, monthly_price, button_label, \
                  popular, show_on_main_page, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW(), NOW()) \
             RETURNING {SERVICE_COLUMNS}"
        ))
        .bind(new_id)
        .bind(req.title)
        .bind(req.features)
        .bind(req.price)
        .bind(req.monthly_price)
        .bind(req.button_label)
        .bind(req.popular)
        .bind(req.show_on_main_page)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(service) => Some(service),
            Err(e) => {
                tracing::error!("create_service error: {:?}", e);
                None
            }
        }
    }

    /// update_service
    ///
    /// Full-record replace: the console submits the complete form, so every
    /// column is overwritten. Returns None when the id does not exist.
    async fn update_service(&self, id: Uuid, req: ServiceRequest) -> Option<Service> {
        sqlx::query_as::<_, Service>(&format!(
            "UPDATE services \
             SET title = $2, features = $3, price = $4, monthly_price = $5, \
                 button_label = $6, popular = $7, show_on_main_page = $8, \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {SERVICE_COLUMNS}"
        ))
        .bind(id)
        .bind(req.title)
        .bind(req.features)
        .bind(req.price)
        .bind(req.monthly_price)
        .bind(req.button_label)
        .bind(req.popular)
        .bind(req.show_on_main_page)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("update_service error: {:?}", e);
            None
        })
    }

    /// toggle_service_visibility
    ///
    /// Single-statement flip of `show_on_main_page`, so concurrent toggles
    /// serialize in the database rather than racing through read-modify-write.
    async fn toggle_service_visibility(&self, id: Uuid) -> Option<Service> {
        sqlx::query_as::<_, Service>(&format!(
            "UPDATE services \
             SET show_on_main_page = NOT show_on_main_page, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {SERVICE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("toggle_service_visibility error: {:?}", e);
            None
        })
    }

    async fn toggle_service_popular(&self, id: Uuid) -> Option<Service> {
        sqlx::query_as::<_, Service>(&format!(
            "UPDATE services \
             SET popular = NOT popular, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {SERVICE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("toggle_service_popular error: {:?}", e);
            None
        })
    }

    async fn delete_service(&self, id: Uuid) -> bool {
        match sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_service error: {:?}", e);
                false
            }
        }
    }

    // --- CONTACT MESSAGES ---

    async fn create_contact(&self, req: CreateContactRequest) -> Option<ContactMessage> {
        let result = sqlx::query_as::<_, ContactMessage>(&format!(
            "INSERT INTO contact_messages (id, name, email, message, seen, received_at) \
             VALUES ($1, $2, $3, $4, false, NOW()) \
             RETURNING {CONTACT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(req.name)
        .bind(req.email)
        .bind(req.message)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(message) => Some(message),
            Err(e) => {
                tracing::error!("create_contact error: {:?}", e);
                None
            }
        }
    }

    /// list_contacts
    ///
    /// Staff inbox ordering: unread-or-not, the newest submission sits on top.
    async fn list_contacts(&self, search: Option<String>) -> Vec<ContactMessage> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(format!(
            "SELECT {CONTACT_COLUMNS} FROM contact_messages WHERE true"
        ));

        if let Some(s) = search {
            let pattern = format!("%{}%", s);
            builder.push(" AND (name ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR email ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }

        builder.push(" ORDER BY received_at DESC");

        match builder
            .build_query_as::<ContactMessage>()
            .fetch_all(&self.pool)
            .await
        {
            Ok(messages) => messages,
            Err(e) => {
                tracing::error!("list_contacts error: {:?}", e);
                vec![]
            }
        }
    }

    async fn toggle_contact_seen(&self, id: Uuid) -> Option<ContactMessage> {
        sqlx::query_as::<_, ContactMessage>(&format!(
            "UPDATE contact_messages SET seen = NOT seen WHERE id = $1 \
             RETURNING {CONTACT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("toggle_contact_seen error: {:?}", e);
            None
        })
    }

    async fn delete_contact(&self, id: Uuid) -> bool {
        match sqlx::query("DELETE FROM contact_messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_contact error: {:?}", e);
                false
            }
        }
    }

    // --- CONSULTATION REQUESTS ---

    async fn create_consultation(
        &self,
        req: CreateConsultationRequest,
    ) -> Option<ConsultationRequest> {
        let result = sqlx::query_as::<_, ConsultationRequest>(&format!(
            "INSERT INTO consultation_requests \
                 (id, full_name, email, phone, company, project_type, \
                  other_project_type, timeline, description, seen, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, false, NOW()) \
             RETURNING {CONSULTATION_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(req.full_name)
        .bind(req.email)
        .bind(req.phone)
        .bind(req.company)
        .bind(req.project_type)
        .bind(req.other_project_type)
        .bind(req.timeline)
        .bind(req.description)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(consultation) => Some(consultation),
            Err(e) => {
                tracing::error!("create_consultation error: {:?}", e);
                None
            }
        }
    }

    async fn list_consultations(&self, search: Option<String>) -> Vec<ConsultationRequest> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(format!(
            "SELECT {CONSULTATION_COLUMNS} FROM consultation_requests WHERE true"
        ));

        if let Some(s) = search {
            let pattern = format!("%{}%", s);
            builder.push(" AND (full_name ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR email ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }

        builder.push(" ORDER BY created_at DESC");

        match builder
            .build_query_as::<ConsultationRequest>()
            .fetch_all(&self.pool)
            .await
        {
            Ok(consultations) => consultations,
            Err(e) => {
                tracing::error!("list_consultations error: {:?}", e);
                vec![]
            }
        }
    }

    async fn toggle_consultation_seen(&self, id: Uuid) -> Option<ConsultationRequest> {
        sqlx::query_as::<_, ConsultationRequest>(&format!(
            "UPDATE consultation_requests SET seen = NOT seen WHERE id = $1 \
             RETURNING {CONSULTATION_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("toggle_consultation_seen error: {:?}", e);
            None
        })
    }

    async fn delete_consultation(&self, id: Uuid) -> bool {
        match sqlx::query("DELETE FROM consultation_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_consultation error: {:?}", e);
                false
            }
        }
    }

    // --- NEWSLETTER SUBSCRIBERS ---

    /// subscribe
    ///
    /// Uses `ON CONFLICT DO NOTHING` against the unique email index so double
    /// subscriptions are **idempotent**: no row comes back for a duplicate and
    /// the caller answers 409. The email arrives trimmed and lowercased.
    async fn subscribe(&self, email: String) -> Option<NewsletterSubscriber> {
        sqlx::query_as::<_, NewsletterSubscriber>(
            "INSERT INTO newsletter_subscribers (id, email, created_at) \
             VALUES ($1, $2, NOW()) \
             ON CONFLICT (email) DO NOTHING \
             RETURNING id, email, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("subscribe error: {:?}", e);
            None
        })
    }

    async fn list_subscribers(&self, search: Option<String>) -> Vec<NewsletterSubscriber> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
            "SELECT id, email, created_at FROM newsletter_subscribers WHERE true",
        );

        if let Some(s) = search {
            builder.push(" AND email ILIKE ");
            builder.push_bind(format!("%{}%", s));
        }

        builder.push(" ORDER BY created_at DESC");

        match builder
            .build_query_as::<NewsletterSubscriber>()
            .fetch_all(&self.pool)
            .await
        {
            Ok(subscribers) => subscribers,
            Err(e) => {
                tracing::error!("list_subscribers error: {:?}", e);
                vec![]
            }
        }
    }

    async fn delete_subscriber(&self, id: Uuid) -> bool {
        match sqlx::query("DELETE FROM newsletter_subscribers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_subscriber error: {:?}", e);
                false
            }
        }
    }

    /// delete_subscribers
    ///
    /// Bulk variant backing the console's checkbox selection. `= ANY($1)`
    /// keeps it a single statement regardless of how many ids arrive.
    async fn delete_subscribers(&self, ids: Vec<Uuid>) -> u64 {
        match sqlx::query("DELETE FROM newsletter_subscribers WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected(),
            Err(e) => {
                tracing::error!("delete_subscribers error: {:?}", e);
                0
            }
        }
    }

    // --- ADMIN ACCOUNTS ---

    /// get_admin
    ///
    /// Account lookup backing the auth extractor's final verification step.
    async fn get_admin(&self, id: Uuid) -> Option<AdminUser> {
        sqlx::query_as::<_, AdminUser>(
            "SELECT id, email, password_hash, role, created_at FROM admin_users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or(None)
    }

    /// get_admin_by_email
    ///
    /// Login lookup. Matched case-insensitively so stored casing never locks
    /// an operator out.
    async fn get_admin_by_email(&self, email: String) -> Option<AdminUser> {
        sqlx::query_as::<_, AdminUser>(
            "SELECT id, email, password_hash, role, created_at \
             FROM admin_users WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or(None)
    }

    async fn count_admins(&self) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM admin_users")
            .fetch_one(&self.pool)
            .await
            .unwrap_or(0)
    }

    /// create_admin
    ///
    /// Used by the local seeding path; the password is already hashed.
    async fn create_admin(
        &self,
        email: String,
        password_hash: String,
        role: String,
    ) -> Option<AdminUser> {
        let result = sqlx::query_as::<_, AdminUser>(
            "INSERT INTO admin_users (id, email, password_hash, role, created_at) \
             VALUES ($1, $2, $3, $4, NOW()) \
             RETURNING id, email, password_hash, role, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(admin) => Some(admin),
            Err(e) => {
                tracing::error!("create_admin error: {:?}", e);
                None
            }
        }
    }

    // --- DASHBOARD ---

    /// get_stats
    ///
    /// Six COUNT queries, one per dashboard tile. A failed counter logs and
    /// reads as zero rather than taking the whole dashboard down.
    async fn get_stats(&self) -> AdminStats {
        let total_services = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM services")
            .fetch_one(&self.pool)
            .await
            .unwrap_or(0);
        let total_messages = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM contact_messages")
            .fetch_one(&self.pool)
            .await
            .unwrap_or(0);
        let unseen_messages = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM contact_messages WHERE seen = false",
        )
        .fetch_one(&self.pool)
        .await
        .unwrap_or(0);
        let total_consultations =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM consultation_requests")
                .fetch_one(&self.pool)
                .await
                .unwrap_or(0);
        let unseen_consultations = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM consultation_requests WHERE seen = false",
        )
        .fetch_one(&self.pool)
        .await
        .unwrap_or(0);
        let total_subscribers =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM newsletter_subscribers")
                .fetch_one(&self.pool)
                .await
                .unwrap_or(0);

        AdminStats {
            total_services,
            total_messages,
            unseen_messages,
            total_consultations,
            unseen_consultations,
            total_subscribers,
        }
    }
}

/// InMemoryRepository
///
/// A `Repository` implementation over plain Vecs, used exclusively for unit and
/// integration testing. It mirrors the SQL semantics that matter to callers
/// (insertion order, newest-first inboxes, case-insensitive search, unique
/// subscriber emails) without requiring a database connection.
#[derive(Default)]
pub struct InMemoryRepository {
    services: Mutex<Vec<Service>>,
    contacts: Mutex<Vec<ContactMessage>>,
    consultations: Mutex<Vec<ConsultationRequest>>,
    subscribers: Mutex<Vec<NewsletterSubscriber>>,
    admins: Mutex<Vec<AdminUser>>,
    /// When true, all operations return a simulated failure.
    should_fail: bool,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }
}

// Mirrors ILIKE '%needle%'.
fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn list_services(&self, search: Option<String>, main_page_only: bool) -> Vec<Service> {
        if self.should_fail {
            return vec![];
        }
        let services = self.services.lock().unwrap();
        services
            .iter()
            .filter(|service| !main_page_only || service.show_on_main_page)
            .filter(|service| match &search {
                Some(needle) => {
                    contains_ci(&service.title, needle)
                        || service
                            .features
                            .iter()
                            .any(|feature| contains_ci(feature, needle))
                }
                None => true,
            })
            .cloned()
            .collect()
    }

    async fn get_service(&self, id: Uuid) -> Option<Service> {
        if self.should_fail {
            return None;
        }
        let services = self.services.lock().unwrap();
        services.iter().find(|service| service.id == id).cloned()
    }

    async fn create_service(&self, req: ServiceRequest) -> Option<Service> {
        if self.should_fail {
            return None;
        }
        let now = Utc::now();
        let service = Service {
            id: Uuid::new_v4(),
            title: req.title,
            features: req.features,
            price: req.price,
            monthly_price: req.monthly_price,
            button_label: req.button_label,
            popular: req.popular,
            show_on_main_page: req.show_on_main_page,
            created_at: now,
            updated_at: now,
        };
        self.services.lock().unwrap().push(service.clone());
        Some(service)
    }

    async fn update_service(&self, id: Uuid, req: ServiceRequest) -> Option<Service> {
        if self.should_fail {
            return None;
        }
        let mut services = self.services.lock().unwrap();
        let service = services.iter_mut().find(|service| service.id == id)?;
        service.title = req.title;
        service.features = req.features;
        service.price = req.price;
        service.monthly_price = req.monthly_price;
        service.button_label = req.button_label;
        service.popular = req.popular;
        service.show_on_main_page = req.show_on_main_page;
        service.updated_at = Utc::now();
        Some(service.clone())
    }

    async fn toggle_service_visibility(&self, id: Uuid) -> Option<Service> {
        if self.should_fail {
            return None;
        }
        let mut services = self.services.lock().unwrap();
        let service = services.iter_mut().find(|service| service.id == id)?;
        service.show_on_main_page = !service.show_on_main_page;
        service.updated_at = Utc::now();
        Some(service.clone())
    }

    async fn toggle_service_popular(&self, id: Uuid) -> Option<Service> {
        if self.should_fail {
            return None;
        }
        let mut services = self.services.lock().unwrap();
        let service = services.iter_mut().find(|service| service.id == id)?;
        service.popular = !service.popular;
        service.updated_at = Utc::now();
        Some(service.clone())
    }

    async fn delete_service(&self, id: Uuid) -> bool {
        if self.should_fail {
            return false;
        }
        let mut services = self.services.lock().unwrap();
        let before = services.len();
        services.retain(|service| service.id != id);
        services.len() < before
    }

    async fn create_contact(&self, req: CreateContactRequest) -> Option<ContactMessage> {
        if self.should_fail {
            return None;
        }
        let message = ContactMessage {
            id: Uuid::new_v4(),
            name: req.name,
            email: req.email,
            message: req.message,
            seen: false,
            received_at: Utc::now(),
        };
        self.contacts.lock().unwrap().push(message.clone());
        Some(message)
    }

    async fn list_contacts(&self, search: Option<String>) -> Vec<ContactMessage> {
        if self.should_fail {
            return vec![];
        }
        let contacts = self.contacts.lock().unwrap();
        contacts
            .iter()
            .rev()
            .filter(|message| match &search {
                Some(needle) => {
                    contains_ci(&message.name, needle) || contains_ci(&message.email, needle)
                }
                None => true,
            })
            .cloned()
            .collect()
    }

    async fn toggle_contact_seen(&self, id: Uuid) -> Option<ContactMessage> {
        if self.should_fail {
            return None;
        }
        let mut contacts = self.contacts.lock().unwrap();
        let message = contacts.iter_mut().find(|message| message.id == id)?;
        message.seen = !message.seen;
        Some(message.clone())
    }

    async fn delete_contact(&self, id: Uuid) -> bool {
        if self.should_fail {
            return false;
        }
        let mut contacts = self.contacts.lock().unwrap();
        let before = contacts.len();
        contacts.retain(|message| message.id != id);
        contacts.len() < before
    }

    async fn create_consultation(
        &self,
        req: CreateConsultationRequest,
    ) -> Option<ConsultationRequest> {
        if self.should_fail {
            return None;
        }
        let consultation = ConsultationRequest {
            id: Uuid::new_v4(),
            full_name: req.full_name,
            email: req.email,
            phone: req.phone,
            company: req.company,
            project_type: req.project_type,
            other_project_type: req.other_project_type,
            timeline: req.timeline,
            description: req.description,
            seen: false,
            created_at: Utc::now(),
        };
        self.consultations.lock().unwrap().push(consultation.clone());
        Some(consultation)
    }

    async fn list_consultations(&self, search: Option<String>) -> Vec<ConsultationRequest> {
        if self.should_fail {
            return vec![];
        }
        let consultations = self.consultations.lock().unwrap();
        consultations
            .iter()
            .rev()
            .filter(|consultation| match &search {
                Some(needle) => {
                    contains_ci(&consultation.full_name, needle)
                        || contains_ci(&consultation.email, needle)
                }
                None => true,
            })
            .cloned()
            .collect()
    }

    async fn toggle_consultation_seen(&self, id: Uuid) -> Option<ConsultationRequest> {
        if self.should_fail {
            return None;
        }
        let mut consultations = self.consultations.lock().unwrap();
        let consultation = consultations
            .iter_mut()
            .find(|consultation| consultation.id == id)?;
        consultation.seen = !consultation.seen;
        Some(consultation.clone())
    }

    async fn delete_consultation(&self, id: Uuid) -> bool {
        if self.should_fail {
            return false;
        }
        let mut consultations = self.consultations.lock().unwrap();
        let before = consultations.len();
        consultations.retain(|consultation| consultation.id != id);
        consultations.len() < before
    }

    async fn subscribe(&self, email: String) -> Option<NewsletterSubscriber> {
        if self.should_fail {
            return None;
        }
        let mut subscribers = self.subscribers.lock().unwrap();
        if subscribers
            .iter()
            .any(|subscriber| subscriber.email.eq_ignore_ascii_case(&email))
        {
            return None;
        }
        let subscriber = NewsletterSubscriber {
            id: Uuid::new_v4(),
            email,
            created_at: Utc::now(),
        };
        subscribers.push(subscriber.clone());
        Some(subscriber)
    }

    async fn list_subscribers(&self, search: Option<String>) -> Vec<NewsletterSubscriber> {
        if self.should_fail {
            return vec![];
        }
        let subscribers = self.subscribers.lock().unwrap();
        subscribers
            .iter()
            .rev()
            .filter(|subscriber| match &search {
                Some(needle) => contains_ci(&subscriber.email, needle),
                None => true,
            })
            .cloned()
            .collect()
    }

    async fn delete_subscriber(&self, id: Uuid) -> bool {
        if self.should_fail {
            return false;
        }
        let mut subscribers = self.subscribers.lock().unwrap();
        let before = subscribers.len();
        subscribers.retain(|subscriber| subscriber.id != id);
        subscribers.len() < before
    }

    async fn delete_subscribers(&self, ids: Vec<Uuid>) -> u64 {
        if self.should_fail {
            return 0;
        }
        let mut subscribers = self.subscribers.lock().unwrap();
        let before = subscribers.len();
        subscribers.retain(|subscriber| !ids.contains(&subscriber.id));
        (before - subscribers.len()) as u64
    }

    async fn get_admin(&self, id: Uuid) -> Option<AdminUser> {
        if self.should_fail {
            return None;
        }
        let admins = self.admins.lock().unwrap();
        admins.iter().find(|admin| admin.id == id).cloned()
    }

    async fn get_admin_by_email(&self, email: String) -> Option<AdminUser> {
        if self.should_fail {
            return None;
        }
        let admins = self.admins.lock().unwrap();
        admins
            .iter()
            .find(|admin| admin.email.eq_ignore_ascii_case(&email))
            .cloned()
    }

    async fn count_admins(&self) -> i64 {
        if self.should_fail {
            return 0;
        }
        self.admins.lock().unwrap().len() as i64
    }

    async fn create_admin(
        &self,
        email: String,
        password_hash: String,
        role: String,
    ) -> Option<AdminUser> {
        if self.should_fail {
            return None;
        }
        let admin = AdminUser {
            id: Uuid::new_v4(),
            email,
            password_hash,
            role,
            created_at: Utc::now(),
        };
        self.admins.lock().unwrap().push(admin.clone());
        Some(admin)
    }

    async fn get_stats(&self) -> AdminStats {
        if self.should_fail {
            return AdminStats::default();
        }
        let contacts = self.contacts.lock().unwrap();
        let consultations = self.consultations.lock().unwrap();
        AdminStats {
            total_services: self.services.lock().unwrap().len() as i64,
            total_messages: contacts.len() as i64,
            unseen_messages: contacts.iter().filter(|message| !message.seen).count() as i64,
            total_consultations: consultations.len() as i64,
            unseen_consultations: consultations
                .iter()
                .filter(|consultation| !consultation.seen)
                .count() as i64,
            total_subscribers: self.subscribers.lock().unwrap().len() as i64,
        }
    }
}
