//! Orders that are paid and still wait for shipping.
//!
//! Two requests: resolve the `paid` transaction state and the `open`
//! delivery state through the state machines, then search orders in both.
//! State IDs differ per installation, which is why they are looked up first.

use std::collections::{BTreeSet, HashMap};

use serde_json::{Value, json};
use shopware_api::{Method, RequestOptions};

use super::{AdminTools, ToolError, render_json_pretty, status_message};

const TRANSACTION_MACHINE: &str = "order_transaction.state";
const DELIVERY_MACHINE: &str = "order_delivery.state";
const PAID_STATE: &str = "paid";
const OPEN_STATE: &str = "open";
const ORDER_LIMIT: u64 = 50;

const PREAMBLE: &str = "Below are the most recent orders (up to 50, newest first) whose payment is 'paid' \
and whose delivery is still 'open', so they are ready to ship.\n\
Present them as a shipping worklist. For every order show the order number, order date, \
customer name and email, the full shipping address and each line item with its quantity. \
Finish with the number of orders and the summed order total. \
If the result holds no orders, say that nothing is waiting for shipment.";

impl AdminTools {
    /// Search orders that are paid and have an open delivery.
    pub async fn ready_to_ship_orders(&self) -> Result<String, ToolError> {
        let states = self.resolve_shipping_states().await?;
        let Some(paid) = non_empty(states.paid) else {
            return Ok(format!(
                "Could not resolve ready-to-ship orders: no '{PAID_STATE}' state found in state machine '{TRANSACTION_MACHINE}'."
            ));
        };
        let Some(open) = non_empty(states.open) else {
            return Ok(format!(
                "Could not resolve ready-to-ship orders: no '{OPEN_STATE}' state found in state machine '{DELIVERY_MACHINE}'."
            ));
        };

        let context = "Error searching ready-to-ship orders";
        let response = self
            .client()
            .authenticated_request(
                Method::POST,
                "/search/order",
                RequestOptions::default().with_json(order_criteria(&paid, &open)),
            )
            .await
            .map_err(ToolError::request(context))?;

        if response.status_code() != 200 {
            return Err(ToolError::upstream(
                response.status_code(),
                format!("Order search failed with {}", status_message(&response)),
            ));
        }

        let orders = response.json().map_err(ToolError::response(context))?;
        Ok(format!("{PREAMBLE}\n\nOrders:\n{}", render_json_pretty(&orders)))
    }

    async fn resolve_shipping_states(&self) -> Result<ShippingStates, ToolError> {
        let context = "Error resolving order states";
        let response = self
            .client()
            .authenticated_request(
                Method::POST,
                "/search/state-machine",
                RequestOptions::default().with_json(state_machine_criteria()),
            )
            .await
            .map_err(ToolError::request(context))?;

        if response.status_code() != 200 {
            return Err(ToolError::upstream(
                response.status_code(),
                format!("State machine search failed with {}", status_message(&response)),
            ));
        }

        let body = response.json().map_err(ToolError::response(context))?;
        Ok(ShippingStates::from_search_result(&body))
    }
}

fn non_empty(ids: BTreeSet<String>) -> Option<Vec<String>> {
    if ids.is_empty() { None } else { Some(ids.into_iter().collect()) }
}

fn state_machine_criteria() -> Value {
    json!({
        "filter": [{
            "type": "equalsAny",
            "field": "technicalName",
            "value": [TRANSACTION_MACHINE, DELIVERY_MACHINE],
        }],
        "associations": {"states": {}},
    })
}

fn order_criteria(paid: &[String], open: &[String]) -> Value {
    json!({
        "limit": ORDER_LIMIT,
        "filter": [
            {"type": "equalsAny", "field": "transactions.stateMachineState.id", "value": paid},
            {"type": "equalsAny", "field": "deliveries.stateMachineState.id", "value": open},
        ],
        "associations": {
            "orderCustomer": {},
            "deliveries": {
                "associations": {
                    "shippingOrderAddress": {"associations": {"country": {}}},
                    "stateMachineState": {},
                },
            },
            "lineItems": {},
            "transactions": {"associations": {"stateMachineState": {}}},
        },
        "includes": {
            "order": ["id", "orderNumber", "orderDateTime", "amountTotal", "orderCustomer", "deliveries", "lineItems", "transactions"],
            "order_customer": ["firstName", "lastName", "email"],
            "order_delivery": ["shippingOrderAddress", "stateMachineState"],
            "order_address": ["firstName", "lastName", "street", "zipcode", "city", "country"],
            "country": ["name", "iso"],
            "order_line_item": ["label", "quantity", "unitPrice", "totalPrice"],
            "order_transaction": ["amount", "stateMachineState"],
            "state_machine_state": ["technicalName"],
        },
        "sort": [{"field": "orderDateTime", "order": "DESC"}],
    })
}

/// State IDs found for the two machines we care about.
#[derive(Debug, Default, PartialEq)]
struct ShippingStates {
    paid: BTreeSet<String>,
    open: BTreeSet<String>,
}

impl ShippingStates {
    /// Read a state-machine search result in plain JSON or JSON:API shape.
    ///
    /// Plain JSON nests `states` inside each machine. JSON:API lists machines
    /// with `attributes`/`relationships` and the states under `included`.
    fn from_search_result(body: &Value) -> Self {
        let machines = body.get("data").and_then(Value::as_array).cloned().unwrap_or_default();

        let mut state_names: HashMap<String, String> = HashMap::new();
        let mut machine_states: HashMap<String, BTreeSet<String>> = HashMap::new();

        for state in body.get("included").and_then(Value::as_array).into_iter().flatten() {
            let (Some(id), Some(name)) = (record_id(state), field(state, "technicalName")) else {
                continue;
            };
            state_names.insert(id.to_string(), name.to_string());
            if let Some(machine_id) = field(state, "stateMachineId") {
                machine_states.entry(machine_id.to_string()).or_default().insert(id.to_string());
            }
        }

        let mut machine_names: HashMap<String, String> = HashMap::new();
        for machine in &machines {
            let (Some(machine_id), Some(machine_name)) = (record_id(machine), field(machine, "technicalName")) else {
                continue;
            };
            machine_names.insert(machine_id.to_string(), machine_name.to_string());
            let members = machine_states.entry(machine_id.to_string()).or_default();

            for state in machine.get("states").and_then(Value::as_array).into_iter().flatten() {
                if let Some(id) = record_id(state) {
                    members.insert(id.to_string());
                    if let Some(name) = field(state, "technicalName") {
                        state_names.insert(id.to_string(), name.to_string());
                    }
                }
            }

            let related = machine.pointer("/relationships/states/data").and_then(Value::as_array);
            for reference in related.into_iter().flatten() {
                if let Some(id) = record_id(reference) {
                    members.insert(id.to_string());
                }
            }
        }

        let mut resolved = ShippingStates::default();
        for (machine_id, members) in &machine_states {
            let target = match machine_names.get(machine_id).map(String::as_str) {
                Some(TRANSACTION_MACHINE) => (PAID_STATE, &mut resolved.paid),
                Some(DELIVERY_MACHINE) => (OPEN_STATE, &mut resolved.open),
                _ => continue,
            };
            let (wanted, ids) = target;
            for id in members {
                if state_names.get(id).is_some_and(|name| name == wanted) {
                    ids.insert(id.clone());
                }
            }
        }
        resolved
    }
}

fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

/// A field from the record itself or, for JSON:API, from its `attributes`.
fn field<'a>(record: &'a Value, name: &str) -> Option<&'a str> {
    record
        .get(name)
        .or_else(|| record.get("attributes").and_then(|attributes| attributes.get(name)))
        .and_then(Value::as_str)
}
