use std::collections::BTreeMap;
use std::fmt;
use tracing::{Level, Span};

/// Protocol, operation and caller of a unit of work, attached as a span
#[derive(Debug, Clone)]
pub struct LogContext {
    pub component: String,
    pub operation: Option<String>,
    pub fields: BTreeMap<String, String>,
}

impl LogContext {
    pub fn with_operation(component: impl Into<String>, operation: impl Into<String>) -> Self {
        LogContext {
            component: component.into(),
            operation: Some(operation.into()),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Span named `bwks` at `level`
    ///
    /// Span field names are static, so extra fields travel as one
    /// comma-separated `fields` value.
    pub fn span(&self, level: Level) -> Span {
        let operation = self.operation.as_deref().unwrap_or("-");
        let fields = self
            .fields
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(",");

        if level == Level::TRACE {
            tracing::trace_span!("bwks", component = %self.component, operation = %operation, fields = %fields)
        } else if level == Level::DEBUG {
            tracing::debug_span!("bwks", component = %self.component, operation = %operation, fields = %fields)
        } else if level == Level::INFO {
            tracing::info_span!("bwks", component = %self.component, operation = %operation, fields = %fields)
        } else if level == Level::WARN {
            tracing::warn_span!("bwks", component = %self.component, operation = %operation, fields = %fields)
        } else {
            tracing::error_span!("bwks", component = %self.component, operation = %operation, fields = %fields)
        }
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.component)?;
        if let Some(op) = &self.operation {
            write!(f, "[{}]", op)?;
        }
        for (key, value) in &self.fields {
            write!(f, "[{}={}]", key, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_orders_fields() {
        let ctx = LogContext::with_operation("ocip", "user_get")
            .with_field("user", "alice@example.com")
            .with_field("admin", "admin@example.com");

        assert_eq!(
            ctx.to_string(),
            "[ocip][user_get][admin=admin@example.com][user=alice@example.com]"
        );
    }
}
