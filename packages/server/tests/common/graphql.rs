//! GraphQL client for integration testing.
//!
//! Executes GraphQL queries directly against the schema without HTTP overhead.

use homefix_core::kernel::ServerDeps;
use homefix_core::server::graphql::{create_schema, GraphQLContext, Schema};
use homefix_core::server::middleware::AuthUser;
use juniper::Variables;
use serde_json::Value;
use std::sync::Arc;

pub struct GraphQLClient {
    schema: Schema,
    context: GraphQLContext,
}

/// Result of a GraphQL execution.
#[derive(Debug)]
pub struct GraphQLResult {
    pub data: Option<Value>,
    /// Serialized field errors (`message`, `path`, `extensions`)
    pub errors: Vec<Value>,
}

impl GraphQLResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Unwraps the data, panicking if there were errors.
    pub fn unwrap(self) -> Value {
        if !self.errors.is_empty() {
            panic!("GraphQL errors: {:?}", self.errors);
        }
        self.data.expect("No data returned")
    }

    /// `extensions.code` of the first error, e.g. `FORBIDDEN`.
    pub fn error_code(&self) -> Option<String> {
        self.errors
            .first()
            .and_then(|e| e["extensions"]["code"].as_str())
            .map(str::to_string)
    }

    pub fn error_message(&self) -> Option<String> {
        self.errors
            .first()
            .and_then(|e| e["message"].as_str())
            .map(str::to_string)
    }

    /// Value at a dotted path, e.g. `"adminStats.totalBookings"`.
    pub fn get(&self, path: &str) -> Value {
        let data = self.data.as_ref().expect("No data returned");
        let mut current = data;
        for key in path.split('.') {
            current = &current[key];
        }
        current.clone()
    }
}

impl GraphQLClient {
    pub fn new(deps: Arc<ServerDeps>, auth_user: Option<AuthUser>) -> Self {
        Self {
            schema: create_schema(),
            context: GraphQLContext::new(deps, auth_user),
        }
    }

    pub async fn execute(&self, query: &str) -> GraphQLResult {
        self.execute_with_vars(query, Variables::new()).await
    }

    pub async fn execute_with_vars(&self, query: &str, variables: Variables) -> GraphQLResult {
        let (result, errors) =
            juniper::execute(query, None, &self.schema, &variables, &self.context)
                .await
                .expect("GraphQL execution failed");

        let data = Some(serde_json::to_value(&result).expect("Failed to serialize GraphQL result"));
        let errors = errors
            .iter()
            .map(|e| serde_json::to_value(e).expect("Failed to serialize GraphQL error"))
            .collect();

        GraphQLResult { data, errors }
    }

    /// Execute a query and expect success, returning the data.
    pub async fn query(&self, query: &str) -> Value {
        self.execute(query).await.unwrap()
    }

    pub async fn query_with_vars(&self, query: &str, variables: Variables) -> Value {
        self.execute_with_vars(query, variables).await.unwrap()
    }
}
