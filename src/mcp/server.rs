//! Costwise MCP Server implementation
//!
//! Provides the MCP server that AI agents use to run pricing calculations.
//! Implements the Model Context Protocol over stdin/stdout using JSON-RPC.
//! Tool arguments are untrusted and go through the same validators as every
//! other external input; unreachable sentinels serialize as `null`.

use std::io::{BufRead, BufReader, Write};

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::core::{
    calculate_break_even_customers, calculate_cogs_breakdown, calculate_investor_metrics,
    calculate_margin_info, BreakEven,
};
use crate::report;
use crate::types::InvestorInputs;
use crate::validate::{
    get_number_or_default, validate_currency_code, validate_fixed_costs,
    validate_non_negative_number, validate_number, validate_positive_number,
    validate_variable_costs,
};

/// JSON-RPC request
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

/// JSON-RPC response
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: String,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

/// JSON-RPC error
#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

/// MCP Tool definition
#[derive(Debug, Serialize)]
struct Tool {
    name: String,
    description: String,
    #[serde(rename = "inputSchema")]
    input_schema: Value,
}

/// Run the MCP server synchronously over stdin/stdout
///
/// This function reads from stdin forever until EOF and cannot be unit
/// tested; the request handling logic is tested via `handle_request()`.
#[cfg(not(coverage))]
pub fn run_mcp_server_sync() {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let reader = BufReader::new(stdin.lock());

    for line in reader.lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        if line.trim().is_empty() {
            continue;
        }

        let request: JsonRpcRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                let error_response = JsonRpcResponse {
                    jsonrpc: "2.0".to_string(),
                    id: Value::Null,
                    result: None,
                    error: Some(JsonRpcError {
                        code: -32700,
                        message: format!("Parse error: {}", e),
                        data: None,
                    }),
                };
                if let Ok(serialized) = serde_json::to_string(&error_response) {
                    let _ = writeln!(stdout, "{}", serialized);
                    let _ = stdout.flush();
                }
                continue;
            }
        };

        let response = handle_request(&request);

        if let Some(resp) = response {
            if let Ok(serialized) = serde_json::to_string(&resp) {
                let _ = writeln!(stdout, "{}", serialized);
                let _ = stdout.flush();
            }
        }
    }
}

/// Stub for coverage builds
#[cfg(coverage)]
pub fn run_mcp_server_sync() {}

/// Handle a JSON-RPC request
fn handle_request(request: &JsonRpcRequest) -> Option<JsonRpcResponse> {
    let id = request.id.clone().unwrap_or(Value::Null);

    match request.method.as_str() {
        "initialize" => Some(JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": {
                        "listChanged": false
                    }
                },
                "serverInfo": {
                    "name": "costwise-mcp",
                    "version": env!("CARGO_PKG_VERSION")
                },
                "instructions": "Costwise MCP Server - SaaS pricing calculations. COGS breakdowns, gross margin with health classification, break-even points, investor metrics (ARR, valuation range, growth milestones), and shareable report encoding."
            })),
            error: None,
        }),
        "notifications/initialized" => None, // No response for notifications
        "tools/list" => Some(JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(json!({
                "tools": get_tools()
            })),
            error: None,
        }),
        "tools/call" => {
            let tool_name = request
                .params
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or("");
            let arguments = request
                .params
                .get("arguments")
                .cloned()
                .unwrap_or(json!({}));

            let result = call_tool(tool_name, &arguments);
            Some(JsonRpcResponse {
                jsonrpc: "2.0".to_string(),
                id,
                result: Some(result),
                error: None,
            })
        }
        "ping" => Some(JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(json!({})),
            error: None,
        }),
        _ => Some(JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code: -32601,
                message: format!("Method not found: {}", request.method),
                data: None,
            }),
        }),
    }
}

fn cost_arrays_schema() -> Value {
    json!({
        "variableCosts": {
            "type": "array",
            "description": "Variable cost items: {id, name, unit, costPerUnit, usagePerCustomer, description}",
            "default": []
        },
        "fixedCosts": {
            "type": "array",
            "description": "Fixed cost items: {id, name, monthlyCost, description}",
            "default": []
        }
    })
}

/// Get all available tools
fn get_tools() -> Vec<Tool> {
    let cost_arrays = cost_arrays_schema();

    vec![
        Tool {
            name: "costwise_calculate".to_string(),
            description: "Compute a COGS breakdown, gross margin with health classification, and break-even point for a set of cost items at a given price and customer count.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "variableCosts": cost_arrays["variableCosts"],
                    "fixedCosts": cost_arrays["fixedCosts"],
                    "customers": {
                        "type": "number",
                        "description": "Paying customer count (0 is allowed)"
                    },
                    "price": {
                        "type": "number",
                        "description": "Monthly price per customer"
                    },
                    "currency": {
                        "type": "string",
                        "description": "Display currency: MYR, USD, SGD, EUR, GBP, AUD (default: MYR)"
                    }
                },
                "required": ["customers", "price"]
            }),
        },
        Tool {
            name: "costwise_break_even".to_string(),
            description: "Find the customer count where fixed costs are covered by the per-customer contribution margin. Returns null when the contribution margin is not positive.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "fixedTotal": {
                        "type": "number",
                        "description": "Total monthly fixed costs"
                    },
                    "price": {
                        "type": "number",
                        "description": "Monthly price per customer"
                    },
                    "variableCostPerCustomer": {
                        "type": "number",
                        "description": "Variable cost incurred per customer per month"
                    }
                },
                "required": ["fixedTotal", "price", "variableCostPerCustomer"]
            }),
        },
        Tool {
            name: "costwise_investor_metrics".to_string(),
            description: "Derive investor metrics from pre-computed scalars: ARR, valuation range (5x/10x/15x), growth milestones, and break-even timeline via compound growth.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "mrr": {
                        "type": "number",
                        "description": "Monthly recurring revenue"
                    },
                    "paidCustomers": {
                        "type": "number",
                        "description": "Current paying customer count"
                    },
                    "arpu": {
                        "type": "number",
                        "description": "Average revenue per user per month"
                    },
                    "grossMargin": {
                        "type": "number",
                        "description": "Gross margin percentage"
                    },
                    "breakEvenCustomers": {
                        "type": ["number", "null"],
                        "description": "Break-even customer count; null when unreachable"
                    },
                    "monthlyGrowthRate": {
                        "type": "number",
                        "description": "Month-over-month growth rate (default: 0.1)"
                    },
                    "ltv": {
                        "type": "number",
                        "description": "Customer lifetime value (default: 0)"
                    }
                },
                "required": ["mrr", "paidCustomers", "arpu", "grossMargin"]
            }),
        },
        Tool {
            name: "costwise_validate_costs".to_string(),
            description: "Validate cost item arrays. Invalid items are reported as warnings as long as at least one item is valid; an all-invalid list is an error listing every item's failure.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": cost_arrays,
            }),
        },
        Tool {
            name: "costwise_encode_report".to_string(),
            description: "Encode a pricing report document into a compact URL-safe token.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "report": {
                        "type": "object",
                        "description": "Report document: {projectName, createdAt?, state, notes?, selectedMockup?}"
                    }
                },
                "required": ["report"]
            }),
        },
        Tool {
            name: "costwise_decode_report".to_string(),
            description: "Decode a report token back into the full report document. Fails on malformed tokens.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "token": {
                        "type": "string",
                        "description": "Token produced by costwise_encode_report"
                    }
                },
                "required": ["token"]
            }),
        },
    ]
}

fn tool_ok(payload: Value) -> Value {
    let text = serde_json::to_string_pretty(&payload)
        .unwrap_or_else(|_| "serialization failed".to_string());
    json!({
        "content": [{
            "type": "text",
            "text": text
        }],
        "isError": false
    })
}

fn tool_err(message: impl std::fmt::Display) -> Value {
    json!({
        "content": [{
            "type": "text",
            "text": message.to_string()
        }],
        "isError": true
    })
}

fn empty_args() -> Map<String, Value> {
    Map::new()
}

/// Call a tool by name
fn call_tool(name: &str, arguments: &Value) -> Value {
    let args = arguments.as_object().cloned().unwrap_or_else(empty_args);

    match name {
        "costwise_calculate" => {
            let empty = json!([]);
            let variable_raw = args.get("variableCosts").unwrap_or(&empty);
            let fixed_raw = args.get("fixedCosts").unwrap_or(&empty);

            let (variable_costs, mut warnings) = match validate_variable_costs(variable_raw) {
                Ok(v) => v,
                Err(e) => return tool_err(e),
            };
            let (fixed_costs, fixed_warnings) = match validate_fixed_costs(fixed_raw) {
                Ok(v) => v,
                Err(e) => return tool_err(e),
            };
            warnings.extend(fixed_warnings);

            let customers = match validate_non_negative_number(
                args.get("customers").unwrap_or(&Value::Null),
                "customers",
            ) {
                Ok(n) => n.trunc() as u64,
                Err(e) => return tool_err(e),
            };
            let price = match validate_positive_number(
                args.get("price").unwrap_or(&Value::Null),
                "price",
            ) {
                Ok(n) => n,
                Err(e) => return tool_err(e),
            };
            let currency =
                match validate_currency_code(args.get("currency").unwrap_or(&Value::Null)) {
                    Ok(c) => c,
                    Err(e) => return tool_err(e),
                };

            let breakdown = calculate_cogs_breakdown(&variable_costs, &fixed_costs, customers);
            let margin = calculate_margin_info(price, breakdown.total_cogs);
            let break_even = calculate_break_even_customers(
                breakdown.fixed_total,
                price,
                breakdown.variable_total,
            );

            tool_ok(json!({
                "breakdown": breakdown,
                "margin": margin,
                "breakEvenCustomers": break_even.as_option(),
                "currency": currency,
                "warnings": warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
            }))
        }
        "costwise_break_even" => {
            let fixed_total = match validate_non_negative_number(
                args.get("fixedTotal").unwrap_or(&Value::Null),
                "fixedTotal",
            ) {
                Ok(n) => n,
                Err(e) => return tool_err(e),
            };
            let price = match validate_positive_number(
                args.get("price").unwrap_or(&Value::Null),
                "price",
            ) {
                Ok(n) => n,
                Err(e) => return tool_err(e),
            };
            let variable_cost = match validate_non_negative_number(
                args.get("variableCostPerCustomer").unwrap_or(&Value::Null),
                "variableCostPerCustomer",
            ) {
                Ok(n) => n,
                Err(e) => return tool_err(e),
            };

            let result = calculate_break_even_customers(fixed_total, price, variable_cost);
            tool_ok(json!({
                "breakEvenCustomers": result.as_option(),
                "achievable": !result.is_unreachable(),
            }))
        }
        "costwise_investor_metrics" => {
            let mrr = match validate_non_negative_number(
                args.get("mrr").unwrap_or(&Value::Null),
                "mrr",
            ) {
                Ok(n) => n,
                Err(e) => return tool_err(e),
            };
            let paid_customers = match validate_non_negative_number(
                args.get("paidCustomers").unwrap_or(&Value::Null),
                "paidCustomers",
            ) {
                Ok(n) => n.trunc() as u64,
                Err(e) => return tool_err(e),
            };
            let arpu = match validate_non_negative_number(
                args.get("arpu").unwrap_or(&Value::Null),
                "arpu",
            ) {
                Ok(n) => n,
                Err(e) => return tool_err(e),
            };
            let gross_margin = match validate_number(
                args.get("grossMargin").unwrap_or(&Value::Null),
                "grossMargin",
            ) {
                Ok(n) => n,
                Err(e) => return tool_err(e),
            };

            // Null or absent means unreachable; a number is a target count.
            let break_even_customers = match args.get("breakEvenCustomers") {
                Some(Value::Number(n)) => match n.as_f64() {
                    Some(f) if f >= 0.0 => BreakEven::Customers(f.trunc() as u64),
                    _ => BreakEven::Unreachable,
                },
                _ => BreakEven::Unreachable,
            };

            let monthly_growth_rate = get_number_or_default(&args, "monthlyGrowthRate", 0.1);
            let ltv = get_number_or_default(&args, "ltv", 0.0);

            let metrics = calculate_investor_metrics(InvestorInputs {
                mrr,
                paid_customers,
                arpu,
                gross_margin,
                break_even_customers,
                monthly_growth_rate,
                ltv,
            });

            match serde_json::to_value(&metrics) {
                Ok(payload) => tool_ok(payload),
                Err(e) => tool_err(e),
            }
        }
        "costwise_validate_costs" => {
            let empty = json!([]);
            let variable_raw = args.get("variableCosts").unwrap_or(&empty);
            let fixed_raw = args.get("fixedCosts").unwrap_or(&empty);

            let (variable_costs, mut warnings) = match validate_variable_costs(variable_raw) {
                Ok(v) => v,
                Err(e) => return tool_err(e),
            };
            let (fixed_costs, fixed_warnings) = match validate_fixed_costs(fixed_raw) {
                Ok(v) => v,
                Err(e) => return tool_err(e),
            };
            warnings.extend(fixed_warnings);

            tool_ok(json!({
                "validVariableCosts": variable_costs.len(),
                "validFixedCosts": fixed_costs.len(),
                "warnings": warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
            }))
        }
        "costwise_encode_report" => {
            let Some(raw) = args.get("report") else {
                return tool_err("report: is required");
            };
            let Some(report) = report::decode_safe(raw) else {
                return tool_err("report: not a valid report document");
            };
            match report::encode(&report) {
                Ok(token) => tool_ok(json!({ "token": token })),
                Err(e) => tool_err(e),
            }
        }
        "costwise_decode_report" => {
            let token = args.get("token").and_then(|v| v.as_str()).unwrap_or("");
            match report::decode(token) {
                Ok(report) => match serde_json::to_value(&report) {
                    Ok(payload) => tool_ok(payload),
                    Err(e) => tool_err(e),
                },
                Err(e) => tool_err(e),
            }
        }
        _ => tool_err(format!("Unknown tool: {}", name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn valid_variable_item() -> Value {
        json!({
            "id": "tokens",
            "name": "API tokens",
            "unit": "1k tokens",
            "costPerUnit": 0.03,
            "usagePerCustomer": 100
        })
    }

    // ═══════════════════════════════════════════════════════════════════════
    // JSON-RPC REQUEST HANDLING TESTS
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_initialize_request() {
        let request = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: "initialize".to_string(),
            params: json!({}),
        };

        let response = handle_request(&request).unwrap();
        assert_eq!(response.jsonrpc, "2.0");
        assert_eq!(response.id, json!(1));
        assert!(response.error.is_none());

        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert_eq!(result["serverInfo"]["name"], "costwise-mcp");
    }

    #[test]
    fn test_initialize_without_id() {
        let request = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: None,
            method: "initialize".to_string(),
            params: json!({}),
        };

        let response = handle_request(&request).unwrap();
        assert_eq!(response.id, Value::Null);
    }

    #[test]
    fn test_tools_list_request() {
        let request = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(2)),
            method: "tools/list".to_string(),
            params: json!({}),
        };

        let response = handle_request(&request).unwrap();
        assert!(response.error.is_none());

        let result = response.result.unwrap();
        let tools = result["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 6);

        let tool_names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
        assert!(tool_names.contains(&"costwise_calculate"));
        assert!(tool_names.contains(&"costwise_break_even"));
        assert!(tool_names.contains(&"costwise_investor_metrics"));
        assert!(tool_names.contains(&"costwise_validate_costs"));
        assert!(tool_names.contains(&"costwise_encode_report"));
        assert!(tool_names.contains(&"costwise_decode_report"));
    }

    #[test]
    fn test_ping_request() {
        let request = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(3)),
            method: "ping".to_string(),
            params: json!({}),
        };

        let response = handle_request(&request).unwrap();
        assert!(response.error.is_none());
        assert_eq!(response.result, Some(json!({})));
    }

    #[test]
    fn test_notification_no_response() {
        let request = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: None,
            method: "notifications/initialized".to_string(),
            params: json!({}),
        };

        assert!(handle_request(&request).is_none());
    }

    #[test]
    fn test_unknown_method_error() {
        let request = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(4)),
            method: "unknown/method".to_string(),
            params: json!({}),
        };

        let response = handle_request(&request).unwrap();
        let error = response.error.unwrap();
        assert_eq!(error.code, -32601);
        assert!(error.message.contains("Method not found"));
    }

    // ═══════════════════════════════════════════════════════════════════════
    // TOOL CALL TESTS
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_unknown_tool_call() {
        let result = call_tool("unknown_tool", &json!({}));
        assert!(result["isError"].as_bool().unwrap());
        assert!(result["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("Unknown tool"));
    }

    #[test]
    fn test_call_calculate() {
        let result = call_tool(
            "costwise_calculate",
            &json!({
                "variableCosts": [valid_variable_item()],
                "fixedCosts": [{"id": "h", "name": "Hosting", "monthlyCost": 75}],
                "customers": 100,
                "price": 29
            }),
        );
        assert!(!result["isError"].as_bool().unwrap());

        let text = result["content"][0]["text"].as_str().unwrap();
        let payload: Value = serde_json::from_str(text).unwrap();
        assert_eq!(payload["breakdown"]["variableTotal"], json!(3.0));
        assert_eq!(payload["breakdown"]["fixedTotal"], json!(75.0));
        assert_eq!(payload["breakEvenCustomers"], json!(3));
    }

    #[test]
    fn test_call_calculate_rejects_bad_price() {
        let result = call_tool(
            "costwise_calculate",
            &json!({
                "customers": 100,
                "price": "free"
            }),
        );
        assert!(result["isError"].as_bool().unwrap());
        assert!(result["content"][0]["text"].as_str().unwrap().contains("price"));
    }

    #[test]
    fn test_call_calculate_partial_warnings() {
        let result = call_tool(
            "costwise_calculate",
            &json!({
                "variableCosts": [valid_variable_item(), {"id": "broken"}],
                "customers": 10,
                "price": 20
            }),
        );
        assert!(!result["isError"].as_bool().unwrap());
        let text = result["content"][0]["text"].as_str().unwrap();
        let payload: Value = serde_json::from_str(text).unwrap();
        assert_eq!(payload["warnings"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_call_break_even_achievable() {
        let result = call_tool(
            "costwise_break_even",
            &json!({
                "fixedTotal": 75,
                "price": 29,
                "variableCostPerCustomer": 3.20
            }),
        );
        assert!(!result["isError"].as_bool().unwrap());
        let text = result["content"][0]["text"].as_str().unwrap();
        let payload: Value = serde_json::from_str(text).unwrap();
        assert_eq!(payload["breakEvenCustomers"], json!(3));
        assert_eq!(payload["achievable"], json!(true));
    }

    #[test]
    fn test_call_break_even_unreachable_is_null() {
        let result = call_tool(
            "costwise_break_even",
            &json!({
                "fixedTotal": 1000,
                "price": 10,
                "variableCostPerCustomer": 15
            }),
        );
        let text = result["content"][0]["text"].as_str().unwrap();
        let payload: Value = serde_json::from_str(text).unwrap();
        assert!(payload["breakEvenCustomers"].is_null());
        assert_eq!(payload["achievable"], json!(false));
    }

    #[test]
    fn test_call_investor_metrics() {
        let result = call_tool(
            "costwise_investor_metrics",
            &json!({
                "mrr": 5000,
                "paidCustomers": 100,
                "arpu": 50,
                "grossMargin": 86.4,
                "breakEvenCustomers": 3
            }),
        );
        assert!(!result["isError"].as_bool().unwrap());
        let text = result["content"][0]["text"].as_str().unwrap();
        let payload: Value = serde_json::from_str(text).unwrap();
        assert_eq!(payload["arr"], json!(60000.0));
        assert_eq!(payload["grossMarginHealth"], json!("healthy"));
        assert_eq!(payload["milestones"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_call_investor_metrics_defaults_growth_rate() {
        // Zero growth rate in the arguments falls back to the 0.1 default.
        let result = call_tool(
            "costwise_investor_metrics",
            &json!({
                "mrr": 100,
                "paidCustomers": 2,
                "arpu": 50,
                "grossMargin": 60,
                "breakEvenCustomers": 10,
                "monthlyGrowthRate": 0
            }),
        );
        let text = result["content"][0]["text"].as_str().unwrap();
        let payload: Value = serde_json::from_str(text).unwrap();
        assert!(payload["monthsToBreakEven"].is_number());
    }

    #[test]
    fn test_call_validate_costs_all_invalid_is_error() {
        let result = call_tool(
            "costwise_validate_costs",
            &json!({
                "variableCosts": [{"id": "a"}, {"id": "b"}]
            }),
        );
        assert!(result["isError"].as_bool().unwrap());
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("variableCosts[0]"));
        assert!(text.contains("variableCosts[1]"));
    }

    #[test]
    fn test_call_encode_decode_round_trip() {
        let report = json!({
            "projectName": "Test Project",
            "state": {
                "customerCount": 100,
                "selectedPrice": 50
            },
            "notes": {"investor": "Investment ready"}
        });

        let encoded = call_tool("costwise_encode_report", &json!({ "report": report }));
        assert!(!encoded["isError"].as_bool().unwrap());
        let text = encoded["content"][0]["text"].as_str().unwrap();
        let token = serde_json::from_str::<Value>(text).unwrap()["token"]
            .as_str()
            .unwrap()
            .to_string();

        let decoded = call_tool("costwise_decode_report", &json!({ "token": token }));
        assert!(!decoded["isError"].as_bool().unwrap());
        let text = decoded["content"][0]["text"].as_str().unwrap();
        let payload: Value = serde_json::from_str(text).unwrap();
        assert_eq!(payload["projectName"], json!("Test Project"));
        assert_eq!(payload["notes"]["investor"], json!("Investment ready"));
    }

    #[test]
    fn test_call_decode_rejects_garbage() {
        let result = call_tool("costwise_decode_report", &json!({ "token": "garbage!!" }));
        assert!(result["isError"].as_bool().unwrap());
    }

    #[test]
    fn test_call_encode_rejects_non_report() {
        let result = call_tool("costwise_encode_report", &json!({ "report": {"x": 1} }));
        assert!(result["isError"].as_bool().unwrap());
    }

    // ═══════════════════════════════════════════════════════════════════════
    // JSON-RPC RESPONSE STRUCT TESTS
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_jsonrpc_response_serialization() {
        let response = JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id: json!(1),
            result: Some(json!({"status": "ok"})),
            error: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"jsonrpc\":\"2.0\""));
        assert!(json.contains("\"id\":1"));
        assert!(!json.contains("\"error\""));
    }

    #[test]
    fn test_jsonrpc_response_with_error() {
        let response = JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id: json!(1),
            result: None,
            error: Some(JsonRpcError {
                code: -32600,
                message: "Invalid Request".to_string(),
                data: None,
            }),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"error\""));
        assert!(json.contains("-32600"));
    }

    #[test]
    fn test_tool_serialization() {
        let tool = Tool {
            name: "test_tool".to_string(),
            description: "A test tool".to_string(),
            input_schema: json!({"type": "object"}),
        };
        let json = serde_json::to_string(&tool).unwrap();
        assert!(json.contains("\"name\":\"test_tool\""));
        assert!(json.contains("\"inputSchema\""));
    }
}
