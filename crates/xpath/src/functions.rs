//! Built-in implementations of the core function library.

use super::engine::{EvaluationContext, XPathValue};
use crate::datasource::DataSourceNode;
use crate::error::XPathError;

/// Dispatches a function call to the correct implementation.
pub fn evaluate_function<'a, N: DataSourceNode<'a>>(
    name: &str,
    args: Vec<XPathValue<N>>,
    e_ctx: &EvaluationContext<'a, N>,
) -> Result<XPathValue<N>, XPathError> {
    match name {
        // Node-set
        "position" => {
            expect_arity(name, &args, 0, 0)?;
            Ok(XPathValue::Number(e_ctx.context_position as f64))
        }
        "last" => {
            expect_arity(name, &args, 0, 0)?;
            Ok(XPathValue::Number(e_ctx.context_size as f64))
        }
        "count" => {
            expect_arity(name, &args, 1, 1)?;
            match &args[0] {
                XPathValue::NodeSet(nodes) => Ok(XPathValue::Number(nodes.len() as f64)),
                _ => Err(XPathError::FunctionError {
                    function: name.to_string(),
                    message: "argument must be a node-set".to_string(),
                }),
            }
        }
        "local-name" => {
            expect_arity(name, &args, 0, 1)?;
            let node = match args.first() {
                Some(XPathValue::NodeSet(nodes)) => nodes.first().copied(),
                Some(_) => {
                    return Err(XPathError::FunctionError {
                        function: name.to_string(),
                        message: "argument must be a node-set".to_string(),
                    });
                }
                None => Some(e_ctx.context_node),
            };
            let local = node
                .and_then(|n| n.name())
                .map(|q| q.local_part.to_string())
                .unwrap_or_default();
            Ok(XPathValue::String(local))
        }

        // String
        "string" => {
            expect_arity(name, &args, 0, 1)?;
            Ok(XPathValue::String(string_arg(&args, e_ctx)))
        }
        "concat" => {
            if args.len() < 2 {
                return Err(arity_error(name, "at least 2", args.len()));
            }
            Ok(XPathValue::String(
                args.iter().map(|a| a.to_string()).collect(),
            ))
        }
        "contains" => {
            expect_arity(name, &args, 2, 2)?;
            Ok(XPathValue::Boolean(
                args[0].to_string().contains(&args[1].to_string()),
            ))
        }
        "starts-with" => {
            expect_arity(name, &args, 2, 2)?;
            Ok(XPathValue::Boolean(
                args[0].to_string().starts_with(&args[1].to_string()),
            ))
        }
        "string-length" => {
            expect_arity(name, &args, 0, 1)?;
            let s = string_arg(&args, e_ctx);
            Ok(XPathValue::Number(s.chars().count() as f64))
        }
        "normalize-space" => {
            expect_arity(name, &args, 0, 1)?;
            let s = string_arg(&args, e_ctx);
            Ok(XPathValue::String(
                s.split_whitespace().collect::<Vec<_>>().join(" "),
            ))
        }

        // Boolean
        "not" => {
            expect_arity(name, &args, 1, 1)?;
            Ok(XPathValue::Boolean(!args[0].to_bool()))
        }
        "true" => {
            expect_arity(name, &args, 0, 0)?;
            Ok(XPathValue::Boolean(true))
        }
        "false" => {
            expect_arity(name, &args, 0, 0)?;
            Ok(XPathValue::Boolean(false))
        }

        // Number
        "number" => {
            expect_arity(name, &args, 0, 1)?;
            let value = match args.first() {
                Some(arg) => arg.to_number(),
                None => XPathValue::NodeSet(vec![e_ctx.context_node]).to_number(),
            };
            Ok(XPathValue::Number(value))
        }

        _ => Err(XPathError::UnknownFunction(name.to_string())),
    }
}

/// The first argument as a string, or the context node's string value.
fn string_arg<'a, N: DataSourceNode<'a>>(
    args: &[XPathValue<N>],
    e_ctx: &EvaluationContext<'a, N>,
) -> String {
    match args.first() {
        Some(arg) => arg.to_string(),
        None => e_ctx.context_node.string_value(),
    }
}

fn expect_arity<N>(
    name: &str,
    args: &[XPathValue<N>],
    min: usize,
    max: usize,
) -> Result<(), XPathError> {
    if (min..=max).contains(&args.len()) {
        Ok(())
    } else if min == max {
        Err(arity_error(name, &min.to_string(), args.len()))
    } else {
        Err(arity_error(name, &format!("{}..{}", min, max), args.len()))
    }
}

fn arity_error(name: &str, expected: &str, got: usize) -> XPathError {
    XPathError::FunctionError {
        function: name.to_string(),
        message: format!("expected {} arguments, got {}", expected, got),
    }
}
