use axum::http::HeaderMap;
use axum::Json;
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Serialize;
use serde_json::{json, Value};

use super::collections::actor;
use crate::domain::find_collection;
use crate::shared::data::db::get_connection;
use crate::shared::error::{ApiError, ApiResult};
use crate::shared::records::write_service::create_in;
use crate::shared::records::Collection;

const ACCOUNTS: [(&str, &str, &str); 5] = [
    ("شركة الأفق للتقنية", "Technology", "customer"),
    ("Nile Logistics", "Logistics", "customer"),
    ("مجموعة الريان", "Retail", "prospect"),
    ("Cedar Health", "Healthcare", "partner"),
    ("Gulf Builders", "Construction", "vendor"),
];

const FIRST_NAMES: [&str; 10] = [
    "لينا", "Omar", "سارة", "Karim", "هدى", "Rami", "نور", "Youssef", "مريم", "Adam",
];

const LAST_NAMES: [&str; 6] = ["الحداد", "Nasser", "العلي", "Khoury", "المصري", "Saleh"];

const STAGES: [&str; 6] = [
    "prospecting",
    "qualification",
    "proposal",
    "negotiation",
    "closed_won",
    "closed_lost",
];

const TICKET_SUBJECTS: [&str; 5] = [
    "لا يمكن تسجيل الدخول",
    "Invoice shows the wrong amount",
    "طلب ميزة تصدير التقارير",
    "App crashes on startup",
    "Question about renewal",
];

const PRIORITIES: [&str; 4] = ["low", "medium", "high", "urgent"];
const CATEGORIES: [&str; 5] = ["technical", "billing", "feature_request", "bug", "general"];

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSummary {
    pub accounts: usize,
    pub contacts: usize,
    pub deals: usize,
    pub tickets: usize,
}

fn collection(path: &str) -> ApiResult<&'static Collection> {
    find_collection(path)
        .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("collection {} is not registered", path)))
}

/// Insert demo accounts, contacts, deals and tickets through the write
/// service, so every row also gets its audit entry
pub async fn seed(db: &DatabaseConnection, actor: &str) -> ApiResult<SeedSummary> {
    let accounts = collection("accounts")?;
    let contacts = collection("contacts")?;
    let deals = collection("opportunities")?;
    let tickets = collection("tickets")?;

    let txn = db.begin().await?;
    let now = chrono::Utc::now();
    let mut summary = SeedSummary::default();

    let mut account_ids: Vec<Value> = Vec::new();
    for (i, (name, industry, account_type)) in ACCOUNTS.iter().enumerate() {
        let payload = json!({
            "name": name,
            "industry": industry,
            "accountType": account_type,
            "phone": format!("+97150{:07}", 1000 + i),
            "employeeCount": 20 * (i as i64 + 1),
            "annualRevenue": 250_000.0 * (i as f64 + 1.0),
        });
        let account = create_in(&txn, accounts, &payload, actor, now).await?;
        account_ids.push(account["id"].clone());
        summary.accounts += 1;
    }

    let mut contact_ids: Vec<Value> = Vec::new();
    for i in 0..30 {
        let first = FIRST_NAMES[i % FIRST_NAMES.len()];
        let last = LAST_NAMES[i % LAST_NAMES.len()];
        let payload = json!({
            "firstName": first,
            "lastName": last,
            "email": format!("contact{:02}@example.com", i + 1),
            "phones": [format!("+96655{:07}", 2000 + i)],
            "jobTitle": if i % 3 == 0 { "Manager" } else { "Engineer" },
            "accountId": account_ids[i % account_ids.len()],
            "isPrimary": i < account_ids.len(),
            "emailOptIn": i % 2 == 0,
            "preferredLanguage": if first.is_ascii() { "en" } else { "ar" },
        });
        let contact = create_in(&txn, contacts, &payload, actor, now).await?;
        contact_ids.push(contact["id"].clone());
        summary.contacts += 1;
    }

    for (i, stage) in STAGES.iter().cycle().take(12).enumerate() {
        let payload = json!({
            "name": format!("Deal {:02}", i + 1),
            "accountId": account_ids[i % account_ids.len()],
            "contactId": contact_ids[i],
            "stage": stage,
            "value": 5_000.0 + 1_250.5 * i as f64,
            "currency": if i % 2 == 0 { "USD" } else { "SAR" },
            "probability": (i as i64 * 10) % 100,
        });
        create_in(&txn, deals, &payload, actor, now).await?;
        summary.deals += 1;
    }

    for i in 0..10 {
        let payload = json!({
            "subject": TICKET_SUBJECTS[i % TICKET_SUBJECTS.len()],
            "contactId": contact_ids[i * 2],
            "accountId": account_ids[i % account_ids.len()],
            "priority": PRIORITIES[i % PRIORITIES.len()],
            "category": CATEGORIES[i % CATEGORIES.len()],
        });
        create_in(&txn, tickets, &payload, actor, now).await?;
        summary.tickets += 1;
    }

    txn.commit().await?;
    tracing::info!(
        "Seeded {} accounts, {} contacts, {} deals, {} tickets",
        summary.accounts,
        summary.contacts,
        summary.deals,
        summary.tickets
    );
    Ok(summary)
}

/// POST /api/dev/seed
pub async fn insert_seed_data(headers: HeaderMap) -> ApiResult<Json<SeedSummary>> {
    let summary = seed(get_connection(), &actor(&headers)).await?;
    Ok(Json(summary))
}
