//! End-to-end scenario: managing a keyed condition list the way a status
//! facility would, with find-or-create writes and predicate reads.

use anyhow::Result;
use fieldpath::path::Path;
use fieldpath::value::Value;

/// Writes (or updates) the condition keyed by `kind`.
fn set_condition(status: &mut Value, kind: &str, state: &str, reason: &str) -> Result<()> {
    let state_path = Path::compile(&format!(".conditions[.kind=\"{}\"].state", kind))?;
    state_path.set(status, state.to_string())?;
    let reason_path = Path::compile(&format!(".conditions[.kind=\"{}\"].reason", kind))?;
    reason_path.set(status, reason.to_string())?;
    Ok(())
}

/// Reads the state of the condition keyed by `kind`, if present.
fn condition_state(status: &Value, kind: &str) -> Result<Option<String>> {
    let path = Path::compile(&format!(".conditions[.kind=\"{}\"].state", kind))?;
    Ok(path.get(status)?.as_str().map(str::to_string))
}

#[test]
fn test_conditions_created_on_first_write() -> Result<()> {
    let mut status = Value::Null;

    set_condition(&mut status, "Ready", "False", "Deploying")?;
    set_condition(&mut status, "Synced", "True", "UpToDate")?;

    assert_eq!(condition_state(&status, "Ready")?, Some("False".to_string()));
    assert_eq!(condition_state(&status, "Synced")?, Some("True".to_string()));
    assert_eq!(condition_state(&status, "Degraded")?, None);

    let conditions = status.get("conditions").unwrap();
    assert_eq!(Value::len(conditions), Some(2));
    Ok(())
}

#[test]
fn test_condition_update_preserves_order() -> Result<()> {
    let mut status = Value::Null;
    set_condition(&mut status, "Ready", "False", "Deploying")?;
    set_condition(&mut status, "Synced", "True", "UpToDate")?;

    // Flipping an existing condition must neither append nor reorder.
    set_condition(&mut status, "Ready", "True", "Deployed")?;

    let kinds = Path::compile(".conditions[].kind")?;
    assert_eq!(
        kinds.get(&status)?.to_value(),
        Some(Value::Sequence(vec![
            Value::from("Ready"),
            Value::from("Synced"),
        ]))
    );
    assert_eq!(condition_state(&status, "Ready")?, Some("True".to_string()));
    Ok(())
}

#[test]
fn test_matching_any_condition_by_value() -> Result<()> {
    let mut status = Value::Null;
    set_condition(&mut status, "Ready", "True", "Deployed")?;
    set_condition(&mut status, "Degraded", "False", "Healthy")?;

    // The shape an object-matching facility uses: collect every leaf under
    // a projection and test whether any equals a literal.
    let states = Path::compile(".conditions[].state")?;
    let any_false = states
        .values(&status)?
        .iter()
        .any(|v| v.to_value() == Some(Value::from("False")));
    assert!(any_false);

    let reasons = Path::compile(".conditions[].reason")?;
    let any_crashed = reasons
        .values(&status)?
        .iter()
        .any(|v| v.to_value() == Some(Value::from("CrashLoop")));
    assert!(!any_crashed);
    Ok(())
}

#[test]
fn test_round_trip_through_yaml() -> Result<()> {
    let mut status = Value::Null;
    set_condition(&mut status, "Ready", "True", "Deployed")?;

    let rendered = status.to_yaml()?;
    let reloaded = Value::from_yaml(&rendered)?;
    assert_eq!(
        condition_state(&reloaded, "Ready")?,
        Some("True".to_string())
    );
    Ok(())
}
