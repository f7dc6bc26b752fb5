use chrono::Utc;
use contracts::domain::a005_lead::aggregate::{Conversion, Lead};
use contracts::domain::a012_audit_log::aggregate::AuditOperation;
use contracts::shared::validation::ValidationErrors;
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::domain::find_collection;
use crate::shared::error::{ApiError, ApiResult};
use crate::shared::records::write_service::{create_in, load_live, persist_change};
use crate::shared::records::{decode, encode, Collection, Record};

/// Options for turning a lead into CRM records
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConvertLeadRequest {
    /// Attach the new contact to an existing account instead of creating one
    pub account_id: Option<String>,
    /// Create an account named after the lead's company
    pub create_account: bool,
    pub create_opportunity: bool,
    pub opportunity_name: Option<String>,
    pub opportunity_value: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub lead: Record,
    pub contact: Record,
    pub account: Option<Record>,
    pub opportunity: Option<Record>,
}

fn collection(path: &str) -> ApiResult<&'static Collection> {
    find_collection(path)
        .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("collection {} is not registered", path)))
}

fn id_of<I: DeserializeOwned>(record: &Record) -> ApiResult<I> {
    let id = record.get("id").cloned().unwrap_or(Value::Null);
    Ok(serde_json::from_value(id)?)
}

fn drop_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .collect::<Map<String, Value>>(),
        ),
        other => other,
    }
}

/// Create the contact (and optionally account and opportunity) for a lead
/// and mark it converted, all in one transaction
pub async fn convert(
    db: &DatabaseConnection,
    lead_id: &str,
    request: &ConvertLeadRequest,
    actor: &str,
) -> ApiResult<ConversionResult> {
    let leads = collection("leads")?;
    let accounts = collection("accounts")?;
    let contacts = collection("contacts")?;
    let opportunities = collection("opportunities")?;

    let txn = db.begin().await?;
    let now = Utc::now();

    let lead_row = load_live(&txn, leads, lead_id).await?;
    let lead: Lead = decode(&lead_row)?;
    if lead.is_converted() {
        return Err(ValidationErrors::single("status", "Lead is already converted").into());
    }

    let account = match (&request.account_id, request.create_account) {
        (Some(id), _) => Some(load_live(&txn, accounts, id).await?),
        (None, true) => {
            let name = lead
                .data
                .company
                .clone()
                .filter(|c| !c.trim().is_empty())
                .ok_or_else(|| {
                    ApiError::from(ValidationErrors::single(
                        "company",
                        "A company name is needed to create an account",
                    ))
                })?;
            let payload = json!({ "name": name, "email": lead.data.email, "phone": lead.data.phone });
            Some(create_in(&txn, accounts, &drop_nulls(payload), actor, now).await?)
        }
        (None, false) => None,
    };
    let account_id = account.as_ref().map(|a| a["id"].clone()).unwrap_or(Value::Null);

    let phones: Vec<String> = lead.data.phone.iter().cloned().collect();
    let contact_payload = json!({
        "firstName": lead.data.first_name,
        "lastName": lead.data.last_name,
        "email": lead.data.email,
        "phones": phones,
        "accountId": account_id,
        "isPrimary": account.is_some(),
        "utmSource": lead.data.utm_source,
        "utmMedium": lead.data.utm_medium,
        "utmCampaign": lead.data.utm_campaign,
    });
    let contact = create_in(&txn, contacts, &drop_nulls(contact_payload), actor, now).await?;

    let opportunity = if request.create_opportunity {
        let name = request
            .opportunity_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .or_else(|| lead.data.company.clone())
            .unwrap_or_else(|| format!("{} {}", lead.data.first_name, lead.data.last_name));
        let payload = json!({
            "name": name.trim(),
            "accountId": account_id,
            "contactId": contact["id"],
            "ownerUserId": lead.data.owner_user_id,
            "value": request.opportunity_value.or(lead.data.budget).unwrap_or(0.0),
            "probability": lead.data.probability,
        });
        Some(create_in(&txn, opportunities, &drop_nulls(payload), actor, now).await?)
    } else {
        None
    };

    let conversion = Conversion {
        contact_id: id_of(&contact)?,
        account_id: account.as_ref().map(id_of).transpose()?,
        opportunity_id: opportunity.as_ref().map(id_of).transpose()?,
    };
    let converted = lead.convert(conversion, now)?;
    let lead_row = persist_change(
        &txn,
        leads,
        &lead_row,
        &encode(&converted)?,
        AuditOperation::Update,
        actor,
    )
    .await?;

    txn.commit().await?;
    tracing::info!("Lead {} converted by {}", lead_id, actor);

    Ok(ConversionResult {
        lead: lead_row,
        contact,
        account,
        opportunity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a012_audit_log::repository::list_for_entity;
    use crate::shared::data::db::memory;
    use crate::shared::records::write_service::{create, DEFAULT_ACTOR};

    async fn new_lead(db: &DatabaseConnection, payload: Value) -> String {
        let leads = find_collection("leads").unwrap();
        let lead = create(db, leads, &payload, DEFAULT_ACTOR).await.unwrap();
        lead["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn conversion_creates_records_and_links_them() {
        let db = memory().await;
        let lead_id = new_lead(
            &db,
            json!({"firstName": "Huda", "lastName": "Nasser", "email": "huda@acme.io",
                   "company": "Acme", "budget": 12000.0, "status": "qualified"}),
        )
        .await;

        let request = ConvertLeadRequest {
            create_account: true,
            create_opportunity: true,
            ..Default::default()
        };
        let result = convert(&db, &lead_id, &request, "sara").await.unwrap();

        let account = result.account.unwrap();
        let opportunity = result.opportunity.unwrap();
        assert_eq!(account["name"], json!("Acme"));
        assert_eq!(result.contact["accountId"], account["id"]);
        assert_eq!(opportunity["contactId"], result.contact["id"]);
        assert_eq!(opportunity["value"], json!(12000.0));
        assert_eq!(result.lead["status"], json!("converted"));
        assert_eq!(result.lead["convertedContactId"], result.contact["id"]);
        assert_eq!(result.lead["convertedOpportunityId"], opportunity["id"]);
        assert!(!result.lead["convertedAt"].is_null());

        let history = list_for_entity(&db, "lead", &lead_id).await.unwrap();
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn converting_twice_is_rejected() {
        let db = memory().await;
        let lead_id = new_lead(&db, json!({"firstName": "Omar"})).await;
        convert(&db, &lead_id, &ConvertLeadRequest::default(), DEFAULT_ACTOR)
            .await
            .unwrap();
        let err = convert(&db, &lead_id, &ConvertLeadRequest::default(), DEFAULT_ACTOR)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn account_creation_needs_a_company() {
        let db = memory().await;
        let lead_id = new_lead(&db, json!({"firstName": "Sami"})).await;
        let request = ConvertLeadRequest {
            create_account: true,
            ..Default::default()
        };
        let err = convert(&db, &lead_id, &request, DEFAULT_ACTOR).await.unwrap_err();
        match err {
            ApiError::Validation(errors) => assert!(errors.has_field("company")),
            other => panic!("unexpected error: {other:?}"),
        }
        let contacts = find_collection("contacts").unwrap();
        let page = crate::shared::data::record_store::list_page(
            &db,
            contacts.table,
            &Default::default(),
        )
        .await
        .unwrap();
        assert_eq!(page.pagination.total, 0);
    }
}
