use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use std::env;

pub mod models;

use models::{
    ContactMessage, Donation, Event, NewsletterSubscriber, Profile, Program, Project,
    ResponseTime, SiteSetting, SiteStat,
};

pub type DbPool = sqlx::SqlitePool;

const SCHEMA_SQL: &str = include_str!("../../migrations/init.sql");

pub async fn init_pool() -> anyhow::Result<DbPool> {
    let url = env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:nonprofit.db?mode=rwc".to_string());

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create DB pool: {}", e))?;

    Ok(pool)
}

/// Fresh in-memory database with the schema applied. Test support only.
pub async fn init_pool_for_tests() -> DbPool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    apply_schema(&pool).await.expect("apply schema");
    pool
}

/// Applies the embedded schema. All statements are `IF NOT EXISTS`, so this is
/// safe to run on every startup.
pub async fn apply_schema(pool: &DbPool) -> anyhow::Result<()> {
    for stmt in SCHEMA_SQL.split(';') {
        let stmt = stmt.trim();
        if stmt.is_empty() {
            continue;
        }
        sqlx::query(stmt).execute(pool).await?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Profiles

pub async fn upsert_profile(
    pool: &DbPool,
    id: &str,
    email: &str,
    full_name: &str,
    now: DateTime<Utc>,
) -> anyhow::Result<Profile> {
    // Keeps the existing role on conflict; new accounts start as 'user'.
    sqlx::query(
        "INSERT INTO profiles (id, email, full_name, role, created_at, updated_at)
         VALUES (?, ?, ?, 'user', ?, ?)
         ON CONFLICT(id) DO UPDATE SET email = excluded.email, full_name = excluded.full_name, updated_at = excluded.updated_at",
    )
    .bind(id)
    .bind(email)
    .bind(full_name)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(profile)
}

pub async fn get_profile(pool: &DbPool, id: &str) -> anyhow::Result<Option<Profile>> {
    let row = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn list_profiles(pool: &DbPool) -> anyhow::Result<Vec<Profile>> {
    let rows = sqlx::query_as::<_, Profile>("SELECT * FROM profiles ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn set_profile_role(
    pool: &DbPool,
    id: &str,
    role: &str,
    now: DateTime<Utc>,
) -> anyhow::Result<bool> {
    let res = sqlx::query("UPDATE profiles SET role = ?, updated_at = ? WHERE id = ?")
        .bind(role)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected() > 0)
}

// ---------------------------------------------------------------------------
// Site settings

pub async fn list_public_settings(pool: &DbPool) -> anyhow::Result<Vec<SiteSetting>> {
    let rows = sqlx::query_as::<_, SiteSetting>(
        "SELECT * FROM site_settings WHERE is_public = 1 ORDER BY key",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn list_settings(pool: &DbPool) -> anyhow::Result<Vec<SiteSetting>> {
    let rows = sqlx::query_as::<_, SiteSetting>("SELECT * FROM site_settings ORDER BY key")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn create_setting(pool: &DbPool, setting: &SiteSetting) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO site_settings (id, key, value, description, is_public, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&setting.id)
    .bind(&setting.key)
    .bind(&setting.value)
    .bind(&setting.description)
    .bind(setting.is_public)
    .bind(setting.created_at)
    .bind(setting.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn update_setting(
    pool: &DbPool,
    id: &str,
    value: &str,
    description: &Option<String>,
    is_public: bool,
    now: DateTime<Utc>,
) -> anyhow::Result<bool> {
    let res = sqlx::query(
        "UPDATE site_settings SET value = ?, description = ?, is_public = ?, updated_at = ? WHERE id = ?",
    )
    .bind(value)
    .bind(description)
    .bind(is_public)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(res.rows_affected() > 0)
}

pub async fn delete_setting(pool: &DbPool, id: &str) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM site_settings WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected() > 0)
}

// ---------------------------------------------------------------------------
// Donations

/// Inserts a donation keyed by its checkout session. Duplicate webhook
/// delivery for the same session is a no-op; returns whether a row was
/// actually written.
pub async fn insert_donation(pool: &DbPool, donation: &Donation) -> anyhow::Result<bool> {
    let res = sqlx::query(
        "INSERT INTO donations (id, donor_name, donor_email, amount, currency, message, is_anonymous, payment_status, stripe_session_id, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(stripe_session_id) DO NOTHING",
    )
    .bind(&donation.id)
    .bind(&donation.donor_name)
    .bind(&donation.donor_email)
    .bind(donation.amount)
    .bind(&donation.currency)
    .bind(&donation.message)
    .bind(donation.is_anonymous)
    .bind(&donation.payment_status)
    .bind(&donation.stripe_session_id)
    .bind(donation.created_at)
    .execute(pool)
    .await?;
    Ok(res.rows_affected() > 0)
}

pub async fn get_donation_by_session(
    pool: &DbPool,
    session_id: &str,
) -> anyhow::Result<Option<Donation>> {
    let row = sqlx::query_as::<_, Donation>("SELECT * FROM donations WHERE stripe_session_id = ?")
        .bind(session_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn list_donations(pool: &DbPool) -> anyhow::Result<Vec<Donation>> {
    let rows = sqlx::query_as::<_, Donation>("SELECT * FROM donations ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Events

pub async fn list_events(pool: &DbPool, published_only: bool) -> anyhow::Result<Vec<Event>> {
    let sql = if published_only {
        "SELECT * FROM events WHERE published = 1 ORDER BY date"
    } else {
        "SELECT * FROM events ORDER BY date"
    };
    let rows = sqlx::query_as::<_, Event>(sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn get_event(pool: &DbPool, id: &str) -> anyhow::Result<Option<Event>> {
    let row = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create_event(pool: &DbPool, event: &Event) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO events (id, title, description, date, location, image_url, max_attendees, current_attendees, registration_fee, published, featured, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&event.id)
    .bind(&event.title)
    .bind(&event.description)
    .bind(event.date)
    .bind(&event.location)
    .bind(&event.image_url)
    .bind(event.max_attendees)
    .bind(event.current_attendees)
    .bind(event.registration_fee)
    .bind(event.published)
    .bind(event.featured)
    .bind(event.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn update_event(pool: &DbPool, event: &Event) -> anyhow::Result<bool> {
    let res = sqlx::query(
        "UPDATE events SET title = ?, description = ?, date = ?, location = ?, image_url = ?, max_attendees = ?, registration_fee = ?, published = ?, featured = ? WHERE id = ?",
    )
    .bind(&event.title)
    .bind(&event.description)
    .bind(event.date)
    .bind(&event.location)
    .bind(&event.image_url)
    .bind(event.max_attendees)
    .bind(event.registration_fee)
    .bind(event.published)
    .bind(event.featured)
    .bind(&event.id)
    .execute(pool)
    .await?;
    Ok(res.rows_affected() > 0)
}

pub async fn set_event_published(
    pool: &DbPool,
    id: &str,
    published: bool,
) -> anyhow::Result<bool> {
    let res = sqlx::query("UPDATE events SET published = ? WHERE id = ?")
        .bind(published)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected() > 0)
}

/// Claims one seat with a single conditional update, so two concurrent
/// registrations can never both pass a capacity check. Returns false when the
/// event is full.
pub async fn register_attendee(pool: &DbPool, id: &str) -> anyhow::Result<bool> {
    let res = sqlx::query(
        "UPDATE events SET current_attendees = current_attendees + 1
         WHERE id = ? AND (max_attendees IS NULL OR current_attendees < max_attendees)",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(res.rows_affected() > 0)
}

pub async fn delete_event(pool: &DbPool, id: &str) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM events WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected() > 0)
}

// ---------------------------------------------------------------------------
// Programs

pub async fn list_programs(pool: &DbPool, published_only: bool) -> anyhow::Result<Vec<Program>> {
    let sql = if published_only {
        "SELECT * FROM programs WHERE published = 1 ORDER BY created_at DESC"
    } else {
        "SELECT * FROM programs ORDER BY created_at DESC"
    };
    let rows = sqlx::query_as::<_, Program>(sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn get_program(pool: &DbPool, id: &str) -> anyhow::Result<Option<Program>> {
    let row = sqlx::query_as::<_, Program>("SELECT * FROM programs WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create_program(pool: &DbPool, program: &Program) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO programs (id, title, description, category, image_url, published, featured, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&program.id)
    .bind(&program.title)
    .bind(&program.description)
    .bind(&program.category)
    .bind(&program.image_url)
    .bind(program.published)
    .bind(program.featured)
    .bind(program.created_at)
    .bind(program.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn update_program(pool: &DbPool, program: &Program) -> anyhow::Result<bool> {
    let res = sqlx::query(
        "UPDATE programs SET title = ?, description = ?, category = ?, image_url = ?, published = ?, featured = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&program.title)
    .bind(&program.description)
    .bind(&program.category)
    .bind(&program.image_url)
    .bind(program.published)
    .bind(program.featured)
    .bind(program.updated_at)
    .bind(&program.id)
    .execute(pool)
    .await?;
    Ok(res.rows_affected() > 0)
}

pub async fn set_program_published(
    pool: &DbPool,
    id: &str,
    published: bool,
    now: DateTime<Utc>,
) -> anyhow::Result<bool> {
    let res = sqlx::query("UPDATE programs SET published = ?, updated_at = ? WHERE id = ?")
        .bind(published)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected() > 0)
}

pub async fn delete_program(pool: &DbPool, id: &str) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM programs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected() > 0)
}

// ---------------------------------------------------------------------------
// Projects

pub async fn list_projects(pool: &DbPool, published_only: bool) -> anyhow::Result<Vec<Project>> {
    let sql = if published_only {
        "SELECT * FROM projects WHERE published = 1 ORDER BY created_at DESC"
    } else {
        "SELECT * FROM projects ORDER BY created_at DESC"
    };
    let rows = sqlx::query_as::<_, Project>(sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn get_project(pool: &DbPool, id: &str) -> anyhow::Result<Option<Project>> {
    let row = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create_project(pool: &DbPool, project: &Project) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO projects (id, title, description, location, target_amount, raised_amount, start_date, end_date, status, image_url, image_gallery, show_gallery, beneficiaries, program_category, published, featured, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&project.id)
    .bind(&project.title)
    .bind(&project.description)
    .bind(&project.location)
    .bind(project.target_amount)
    .bind(project.raised_amount)
    .bind(project.start_date)
    .bind(project.end_date)
    .bind(&project.status)
    .bind(&project.image_url)
    .bind(&project.image_gallery)
    .bind(project.show_gallery)
    .bind(project.beneficiaries)
    .bind(&project.program_category)
    .bind(project.published)
    .bind(project.featured)
    .bind(project.created_at)
    .bind(project.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn update_project(pool: &DbPool, project: &Project) -> anyhow::Result<bool> {
    let res = sqlx::query(
        "UPDATE projects SET title = ?, description = ?, location = ?, target_amount = ?, start_date = ?, end_date = ?, status = ?, image_url = ?, image_gallery = ?, show_gallery = ?, beneficiaries = ?, program_category = ?, published = ?, featured = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&project.title)
    .bind(&project.description)
    .bind(&project.location)
    .bind(project.target_amount)
    .bind(project.start_date)
    .bind(project.end_date)
    .bind(&project.status)
    .bind(&project.image_url)
    .bind(&project.image_gallery)
    .bind(project.show_gallery)
    .bind(project.beneficiaries)
    .bind(&project.program_category)
    .bind(project.published)
    .bind(project.featured)
    .bind(project.updated_at)
    .bind(&project.id)
    .execute(pool)
    .await?;
    Ok(res.rows_affected() > 0)
}

pub async fn set_project_published(
    pool: &DbPool,
    id: &str,
    published: bool,
    now: DateTime<Utc>,
) -> anyhow::Result<bool> {
    let res = sqlx::query("UPDATE projects SET published = ?, updated_at = ? WHERE id = ?")
        .bind(published)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected() > 0)
}

/// Applied only from the payment webhook once a checkout session completes.
pub async fn increment_raised_amount(
    pool: &DbPool,
    id: &str,
    amount: f64,
    now: DateTime<Utc>,
) -> anyhow::Result<bool> {
    let res = sqlx::query(
        "UPDATE projects SET raised_amount = raised_amount + ?, updated_at = ? WHERE id = ?",
    )
    .bind(amount)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(res.rows_affected() > 0)
}

pub async fn delete_project(pool: &DbPool, id: &str) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM projects WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected() > 0)
}

// ---------------------------------------------------------------------------
// Contact messages

pub async fn insert_contact_message(pool: &DbPool, msg: &ContactMessage) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO contact_messages (id, name, email, subject, message, status, assigned_to, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&msg.id)
    .bind(&msg.name)
    .bind(&msg.email)
    .bind(&msg.subject)
    .bind(&msg.message)
    .bind(&msg.status)
    .bind(&msg.assigned_to)
    .bind(msg.created_at)
    .bind(msg.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn list_contact_messages(pool: &DbPool) -> anyhow::Result<Vec<ContactMessage>> {
    let rows = sqlx::query_as::<_, ContactMessage>(
        "SELECT * FROM contact_messages ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn update_contact_message(
    pool: &DbPool,
    id: &str,
    status: &str,
    assigned_to: &Option<String>,
    now: DateTime<Utc>,
) -> anyhow::Result<bool> {
    let res = sqlx::query(
        "UPDATE contact_messages SET status = ?, assigned_to = ?, updated_at = ? WHERE id = ?",
    )
    .bind(status)
    .bind(assigned_to)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(res.rows_affected() > 0)
}

pub async fn delete_contact_message(pool: &DbPool, id: &str) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM contact_messages WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected() > 0)
}

// ---------------------------------------------------------------------------
// Newsletter subscribers

pub async fn get_subscriber_by_email(
    pool: &DbPool,
    email: &str,
) -> anyhow::Result<Option<NewsletterSubscriber>> {
    let row = sqlx::query_as::<_, NewsletterSubscriber>(
        "SELECT * FROM newsletter_subscribers WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn insert_subscriber(
    pool: &DbPool,
    subscriber: &NewsletterSubscriber,
) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO newsletter_subscribers (id, email, name, user_id, subscribed_at, is_active, unsubscribe_token)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&subscriber.id)
    .bind(&subscriber.email)
    .bind(&subscriber.name)
    .bind(&subscriber.user_id)
    .bind(subscriber.subscribed_at)
    .bind(subscriber.is_active)
    .bind(&subscriber.unsubscribe_token)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn set_subscriber_active(
    pool: &DbPool,
    id: &str,
    is_active: bool,
) -> anyhow::Result<bool> {
    let res = sqlx::query("UPDATE newsletter_subscribers SET is_active = ? WHERE id = ?")
        .bind(is_active)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected() > 0)
}

pub async fn unsubscribe_by_token(pool: &DbPool, token: &str) -> anyhow::Result<bool> {
    let res =
        sqlx::query("UPDATE newsletter_subscribers SET is_active = 0 WHERE unsubscribe_token = ?")
            .bind(token)
            .execute(pool)
            .await?;
    Ok(res.rows_affected() > 0)
}

pub async fn list_subscribers(pool: &DbPool) -> anyhow::Result<Vec<NewsletterSubscriber>> {
    let rows = sqlx::query_as::<_, NewsletterSubscriber>(
        "SELECT * FROM newsletter_subscribers ORDER BY subscribed_at DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn delete_subscriber(pool: &DbPool, id: &str) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM newsletter_subscribers WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected() > 0)
}

// ---------------------------------------------------------------------------
// Display metadata

pub async fn list_site_stats(
    pool: &DbPool,
    page: Option<&str>,
    active_only: bool,
) -> anyhow::Result<Vec<SiteStat>> {
    let rows = match (page, active_only) {
        (Some(p), true) => {
            sqlx::query_as::<_, SiteStat>(
                "SELECT * FROM site_stats WHERE page = ? AND is_active = 1 ORDER BY display_order",
            )
            .bind(p)
            .fetch_all(pool)
            .await?
        }
        (Some(p), false) => {
            sqlx::query_as::<_, SiteStat>(
                "SELECT * FROM site_stats WHERE page = ? ORDER BY display_order",
            )
            .bind(p)
            .fetch_all(pool)
            .await?
        }
        (None, true) => {
            sqlx::query_as::<_, SiteStat>(
                "SELECT * FROM site_stats WHERE is_active = 1 ORDER BY display_order",
            )
            .fetch_all(pool)
            .await?
        }
        (None, false) => {
            sqlx::query_as::<_, SiteStat>("SELECT * FROM site_stats ORDER BY display_order")
                .fetch_all(pool)
                .await?
        }
    };
    Ok(rows)
}

pub async fn create_site_stat(pool: &DbPool, stat: &SiteStat) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO site_stats (id, key, label, display_order, is_active, page) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&stat.id)
    .bind(&stat.key)
    .bind(&stat.label)
    .bind(stat.display_order)
    .bind(stat.is_active)
    .bind(&stat.page)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn update_site_stat(pool: &DbPool, stat: &SiteStat) -> anyhow::Result<bool> {
    let res = sqlx::query(
        "UPDATE site_stats SET key = ?, label = ?, display_order = ?, is_active = ?, page = ? WHERE id = ?",
    )
    .bind(&stat.key)
    .bind(&stat.label)
    .bind(stat.display_order)
    .bind(stat.is_active)
    .bind(&stat.page)
    .bind(&stat.id)
    .execute(pool)
    .await?;
    Ok(res.rows_affected() > 0)
}

pub async fn delete_site_stat(pool: &DbPool, id: &str) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM site_stats WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected() > 0)
}

pub async fn list_response_times(
    pool: &DbPool,
    page: Option<&str>,
    active_only: bool,
) -> anyhow::Result<Vec<ResponseTime>> {
    let rows = match (page, active_only) {
        (Some(p), true) => {
            sqlx::query_as::<_, ResponseTime>(
                "SELECT * FROM response_times WHERE page = ? AND is_active = 1 ORDER BY display_order",
            )
            .bind(p)
            .fetch_all(pool)
            .await?
        }
        (Some(p), false) => {
            sqlx::query_as::<_, ResponseTime>(
                "SELECT * FROM response_times WHERE page = ? ORDER BY display_order",
            )
            .bind(p)
            .fetch_all(pool)
            .await?
        }
        (None, true) => {
            sqlx::query_as::<_, ResponseTime>(
                "SELECT * FROM response_times WHERE is_active = 1 ORDER BY display_order",
            )
            .fetch_all(pool)
            .await?
        }
        (None, false) => {
            sqlx::query_as::<_, ResponseTime>("SELECT * FROM response_times ORDER BY display_order")
                .fetch_all(pool)
                .await?
        }
    };
    Ok(rows)
}

pub async fn create_response_time(pool: &DbPool, row: &ResponseTime) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO response_times (id, inquiry_type, response_time, display_order, is_active, page) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&row.id)
    .bind(&row.inquiry_type)
    .bind(&row.response_time)
    .bind(row.display_order)
    .bind(row.is_active)
    .bind(&row.page)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn update_response_time(pool: &DbPool, row: &ResponseTime) -> anyhow::Result<bool> {
    let res = sqlx::query(
        "UPDATE response_times SET inquiry_type = ?, response_time = ?, display_order = ?, is_active = ?, page = ? WHERE id = ?",
    )
    .bind(&row.inquiry_type)
    .bind(&row.response_time)
    .bind(row.display_order)
    .bind(row.is_active)
    .bind(&row.page)
    .bind(&row.id)
    .execute(pool)
    .await?;
    Ok(res.rows_affected() > 0)
}

pub async fn delete_response_time(pool: &DbPool, id: &str) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM response_times WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected() > 0)
}
