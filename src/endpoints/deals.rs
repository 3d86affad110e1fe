//! Deal endpoint handlers.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::info;

use super::{DEALS_PATH, HandlerContext, HandlerError};
use crate::sim::types::{RequestDescriptor, ResponseDescriptor};
use crate::store::{Deal, DealStatus, DealStore};

const DEAL_NOT_FOUND: &str = "Deal not found";
const INVALID_JSON: &str = "Invalid JSON body";
const NOT_AN_OBJECT: &str = "Request body must be a JSON object";
const MISSING_REQUIRED: &str = "Missing required fields: name, originator";
const DEAL_ID_PARAM: &str = "dealId";

/// Fields accepted when creating a deal. Server-assigned fields (`id`,
/// `submissionDate`) and unknown keys are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewDeal {
    name: String,
    originator: String,
    amount: Option<f64>,
    currency: Option<String>,
    status: Option<DealStatus>,
    credit_score: Option<u32>,
    facility_id: Option<String>,
    risk_score: Option<f64>,
}

/// `GET /api/v1/deals[?originator=X]`
pub(super) fn list(
    request: &RequestDescriptor,
    store: &mut dyn DealStore,
) -> Result<ResponseDescriptor, HandlerError> {
    let deals = store.deals()?;
    let deals: Vec<Deal> = match request.query_param("originator").filter(|o| !o.is_empty()) {
        Some(originator) => deals
            .into_iter()
            .filter(|d| d.originator == originator)
            .collect(),
        None => deals,
    };
    Ok(ResponseDescriptor::json(200, serde_json::to_value(&deals)?))
}

/// `GET /api/v1/deals/{dealId}`
pub(super) fn get(
    request: &RequestDescriptor,
    store: &mut dyn DealStore,
) -> Result<ResponseDescriptor, HandlerError> {
    let Some(id) = request.path_param(DEAL_ID_PARAM) else {
        return Ok(missing_deal_id());
    };
    match store.deal(id)? {
        Some(deal) => Ok(ResponseDescriptor::json(200, serde_json::to_value(&deal)?)),
        None => Ok(ResponseDescriptor::error(404, DEAL_NOT_FOUND)),
    }
}

/// `POST /api/v1/deals`
pub(super) fn create(
    request: &RequestDescriptor,
    store: &mut dyn DealStore,
    ctx: &mut HandlerContext<'_>,
) -> Result<ResponseDescriptor, HandlerError> {
    let fields = match parse_object(request.body.as_deref()) {
        Ok(fields) => fields,
        Err(resp) => return Ok(resp),
    };
    if !is_present(&fields, "name") || !is_present(&fields, "originator") {
        return Ok(ResponseDescriptor::error(400, MISSING_REQUIRED));
    }
    let new: NewDeal = match serde_json::from_value(Value::Object(fields)) {
        Ok(new) => new,
        Err(e) => return Ok(invalid_fields(&e)),
    };

    let id = ctx.ids.next_id(&*store)?;
    let deal = Deal {
        id: id.clone(),
        name: new.name,
        originator: new.originator,
        amount: new.amount.unwrap_or(0.0),
        currency: new.currency.unwrap_or_else(|| "USD".to_string()),
        status: new.status.unwrap_or(DealStatus::Draft),
        submission_date: ctx.today.format("%Y-%m-%d").to_string(),
        credit_score: new.credit_score,
        facility_id: new.facility_id,
        risk_score: new.risk_score,
    };
    let body = serde_json::to_value(&deal)?;
    store.insert_deal(deal)?;
    info!(deal_id = %id, "created deal");

    Ok(ResponseDescriptor::json(201, body).with_header("Location", format!("{DEALS_PATH}/{id}")))
}

/// `PUT /api/v1/deals/{dealId}`: shallow merge of the body onto the record.
///
/// The path id always wins over an `id` key in the body.
pub(super) fn update(
    request: &RequestDescriptor,
    store: &mut dyn DealStore,
) -> Result<ResponseDescriptor, HandlerError> {
    let Some(id) = request.path_param(DEAL_ID_PARAM) else {
        return Ok(missing_deal_id());
    };
    let Some(existing) = store.deal(id)? else {
        return Ok(ResponseDescriptor::error(404, DEAL_NOT_FOUND));
    };
    let patch = match parse_object(request.body.as_deref()) {
        Ok(patch) => patch,
        Err(resp) => return Ok(resp),
    };

    let Value::Object(mut fields) = serde_json::to_value(&existing)? else {
        return Err(HandlerError::Internal(format!(
            "deal {id} did not encode as a JSON object"
        )));
    };
    for (key, value) in patch {
        if key != "id" {
            fields.insert(key, value);
        }
    }
    let updated: Deal = match serde_json::from_value(Value::Object(fields)) {
        Ok(deal) => deal,
        Err(e) => return Ok(invalid_fields(&e)),
    };

    let body = serde_json::to_value(&updated)?;
    if !store.update_deal(updated)? {
        return Ok(ResponseDescriptor::error(404, DEAL_NOT_FOUND));
    }
    info!(deal_id = %id, "updated deal");
    Ok(ResponseDescriptor::json(200, body))
}

/// `DELETE /api/v1/deals/{dealId}`
pub(super) fn delete(
    request: &RequestDescriptor,
    store: &mut dyn DealStore,
) -> Result<ResponseDescriptor, HandlerError> {
    let Some(id) = request.path_param(DEAL_ID_PARAM) else {
        return Ok(missing_deal_id());
    };
    match store.delete_deal(id)? {
        Some(_) => {
            info!(deal_id = %id, "deleted deal");
            Ok(ResponseDescriptor::empty(204))
        }
        None => Ok(ResponseDescriptor::error(404, DEAL_NOT_FOUND)),
    }
}

/// Parses a request body that must be a JSON object.
fn parse_object(body: Option<&str>) -> Result<Map<String, Value>, ResponseDescriptor> {
    let value: Value = serde_json::from_str(body.unwrap_or(""))
        .map_err(|_| ResponseDescriptor::error(400, INVALID_JSON))?;
    match value {
        Value::Object(fields) => Ok(fields),
        _ => Err(ResponseDescriptor::error(400, NOT_AN_OBJECT)),
    }
}

/// Absent, `null` and `""` all count as missing.
fn is_present(fields: &Map<String, Value>, key: &str) -> bool {
    match fields.get(key) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

fn invalid_fields(err: &serde_json::Error) -> ResponseDescriptor {
    ResponseDescriptor::error(400, format!("Invalid deal fields: {err}"))
}

fn missing_deal_id() -> ResponseDescriptor {
    ResponseDescriptor::error(400, format!("Missing path parameter: {DEAL_ID_PARAM}"))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;
    use crate::sim::types::Method;
    use crate::store::{DealIdGenerator, IdStrategy, InMemoryStore, SeedSet};

    fn request(method: Method, deal_id: Option<&str>, body: Option<&str>) -> RequestDescriptor {
        let mut path_params = BTreeMap::new();
        let mut path = DEALS_PATH.to_string();
        if let Some(id) = deal_id {
            path_params.insert(DEAL_ID_PARAM.to_string(), id.to_string());
            path = format!("{DEALS_PATH}/{id}");
        }
        RequestDescriptor {
            method,
            path,
            path_params,
            query: Vec::new(),
            headers: Vec::new(),
            body: body.map(str::to_string),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn create_fills_defaults_and_location() {
        let mut store = InMemoryStore::seeded(SeedSet::Empty);
        let mut ids = DealIdGenerator::new(IdStrategy::Sequential, 0);
        let mut ctx = HandlerContext {
            today: today(),
            ids: &mut ids,
        };
        let req = request(
            Method::Post,
            None,
            Some(r#"{"name":"Test Co","originator":"Acme"}"#),
        );

        let resp = create(&req, &mut store, &mut ctx).unwrap();

        assert_eq!(resp.status, 201);
        assert_eq!(
            resp.headers.get("Location").map(String::as_str),
            Some("/api/v1/deals/D1000")
        );
        let body = resp.body.unwrap();
        assert_eq!(body["id"], "D1000");
        assert_eq!(body["status"], "Draft");
        assert_eq!(body["amount"], 0.0);
        assert_eq!(body["currency"], "USD");
        assert_eq!(body["submissionDate"], "2024-03-01");
        assert_eq!(store.deal_count().unwrap(), 1);
    }

    #[test]
    fn create_ignores_client_supplied_id() {
        let mut store = InMemoryStore::seeded(SeedSet::Demo);
        let mut ids = DealIdGenerator::new(IdStrategy::Sequential, 0);
        let mut ctx = HandlerContext {
            today: today(),
            ids: &mut ids,
        };
        let req = request(
            Method::Post,
            None,
            Some(r#"{"id":"D001","name":"Dup","originator":"Acme","amount":5}"#),
        );

        let resp = create(&req, &mut store, &mut ctx).unwrap();

        assert_eq!(resp.status, 201);
        let body = resp.body.unwrap();
        assert_ne!(body["id"], "D001");
        assert_eq!(body["amount"], 5.0);
    }

    #[test]
    fn create_treats_empty_name_as_missing() {
        let mut store = InMemoryStore::seeded(SeedSet::Empty);
        let mut ids = DealIdGenerator::new(IdStrategy::Sequential, 0);
        let mut ctx = HandlerContext {
            today: today(),
            ids: &mut ids,
        };
        for body in [
            r#"{"name":"","originator":"Acme"}"#,
            r#"{"name":null,"originator":"Acme"}"#,
            r#"{"name":"X"}"#,
        ] {
            let resp = create(&request(Method::Post, None, Some(body)), &mut store, &mut ctx).unwrap();
            assert_eq!(resp.status, 400, "body {body}");
            assert_eq!(resp.error_message(), Some(MISSING_REQUIRED));
        }
        assert_eq!(store.deal_count().unwrap(), 0);
    }

    #[test]
    fn create_rejects_malformed_and_mistyped_bodies() {
        let mut store = InMemoryStore::seeded(SeedSet::Empty);
        let mut ids = DealIdGenerator::new(IdStrategy::Sequential, 0);
        let mut ctx = HandlerContext {
            today: today(),
            ids: &mut ids,
        };

        let resp = create(&request(Method::Post, None, Some("{name:")), &mut store, &mut ctx).unwrap();
        assert_eq!(resp.error_message(), Some(INVALID_JSON));

        let resp = create(&request(Method::Post, None, None), &mut store, &mut ctx).unwrap();
        assert_eq!(resp.error_message(), Some(INVALID_JSON));

        let resp = create(&request(Method::Post, None, Some("[1,2]")), &mut store, &mut ctx).unwrap();
        assert_eq!(resp.error_message(), Some(NOT_AN_OBJECT));

        let resp = create(
            &request(
                Method::Post,
                None,
                Some(r#"{"name":"X","originator":"Y","amount":"lots"}"#),
            ),
            &mut store,
            &mut ctx,
        )
        .unwrap();
        assert_eq!(resp.status, 400);
        assert!(resp.error_message().unwrap().starts_with("Invalid deal fields"));
        assert_eq!(store.deal_count().unwrap(), 0);
    }

    #[test]
    fn update_merges_shallowly_and_keeps_path_id() {
        let mut store = InMemoryStore::seeded(SeedSet::Demo);
        let before = store.deal("D002").unwrap().unwrap();

        let req = request(
            Method::Put,
            Some("D002"),
            Some(r#"{"id":"D999","status":"Approved","riskScore":null}"#),
        );
        let resp = update(&req, &mut store).unwrap();

        assert_eq!(resp.status, 200);
        let after = store.deal("D002").unwrap().unwrap();
        assert_eq!(after.status, DealStatus::Approved);
        assert_eq!(after.risk_score, None);
        assert_eq!(after.name, before.name);
        assert_eq!(after.amount, before.amount);
        assert!(store.deal("D999").unwrap().is_none());
    }

    #[test]
    fn update_checks_existence_before_body() {
        let mut store = InMemoryStore::seeded(SeedSet::Demo);
        let resp = update(&request(Method::Put, Some("D404"), Some("not json")), &mut store).unwrap();
        assert_eq!(resp.status, 404);

        let resp = update(&request(Method::Put, Some("D001"), Some("not json")), &mut store).unwrap();
        assert_eq!(resp.status, 400);
        assert_eq!(resp.error_message(), Some(INVALID_JSON));
    }

    #[test]
    fn update_rejects_unknown_status() {
        let mut store = InMemoryStore::seeded(SeedSet::Demo);
        let before = store.deal("D001").unwrap();
        let resp = update(
            &request(Method::Put, Some("D001"), Some(r#"{"status":"Archived"}"#)),
            &mut store,
        )
        .unwrap();
        assert_eq!(resp.status, 400);
        assert_eq!(store.deal("D001").unwrap(), before);
    }

    #[test]
    fn list_filters_by_exact_originator() {
        let mut store = InMemoryStore::seeded(SeedSet::Demo);
        let mut req = request(Method::Get, None, None);
        req.query.push(crate::sim::types::KeyValue::new("originator", "FinCorp"));

        let resp = list(&req, &mut store).unwrap();
        let body = resp.body.unwrap();
        let deals = body.as_array().unwrap();
        assert!(!deals.is_empty());
        assert!(deals.iter().all(|d| d["originator"] == json!("FinCorp")));
    }

    #[test]
    fn missing_path_param_is_a_client_error() {
        let mut store = InMemoryStore::seeded(SeedSet::Demo);
        let resp = get(&request(Method::Get, None, None), &mut store).unwrap();
        assert_eq!(resp.status, 400);
        assert_eq!(resp.error_message(), Some("Missing path parameter: dealId"));
    }

    #[test]
    fn delete_returns_empty_204() {
        let mut store = InMemoryStore::seeded(SeedSet::Demo);
        let resp = delete(&request(Method::Delete, Some("D003"), None), &mut store).unwrap();
        assert_eq!(resp.status, 204);
        assert!(resp.body.is_none());
        assert!(store.deal("D003").unwrap().is_none());
    }
}
