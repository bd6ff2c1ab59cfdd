//! Role-gated space data filter.
//!
//! Appends available-space details to the conversation for permitted user
//! roles; everyone else gets a fixed denial message. All other body fields
//! pass through untouched.

use async_trait::async_trait;

use crate::chat::{Message, RequestBody, UserInfo};
use crate::config::FilterConfig;
use crate::error::Result;
use crate::pipeline::FilterPipeline;
use crate::spaces::SpaceClient;

/// Message appended when retrieval yields nothing.
pub const NO_SPACES_MESSAGE: &str = "No available spaces found or error occurred.";

/// Message appended for roles outside the allow list.
pub const DENIED_MESSAGE: &str = "Your role does not permit space data retrieval.";

/// Filter that injects space listings for permitted roles.
pub struct SpaceDataFilter {
    name: String,
    target_user_roles: Vec<String>,
    spaces: SpaceClient,
}

impl SpaceDataFilter {
    /// Create the filter from config.
    pub fn new(config: FilterConfig) -> Result<Self> {
        let spaces = SpaceClient::new(&config)?;

        Ok(Self {
            name: "Space Data Retrieval Pipeline".to_string(),
            target_user_roles: config.target_user_roles,
            spaces,
        })
    }

    fn role_permitted(&self, user: Option<&UserInfo>) -> bool {
        let role = user.map(UserInfo::role_or_unknown).unwrap_or("unknown");
        self.target_user_roles.iter().any(|allowed| allowed == role)
    }
}

#[async_trait]
impl FilterPipeline for SpaceDataFilter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn inlet(&self, mut body: RequestBody, user: Option<&UserInfo>) -> Result<RequestBody> {
        log::info!("Inlet function called - Processing Request");
        log::debug!("User role: {}", user.map(UserInfo::role_or_unknown).unwrap_or("unknown"));

        let content = if self.role_permitted(user) {
            log::info!("User role verified, retrieving space data");
            match self.spaces.retrieve_space_data().await {
                Some(info) => format!("Available Space Details: {}", info),
                None => NO_SPACES_MESSAGE.to_string(),
            }
        } else {
            log::info!("User role does not permit data retrieval");
            DENIED_MESSAGE.to_string()
        };

        body.messages.push(Message::assistant(content));
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Role;

    fn user_with_role(role: &str) -> UserInfo {
        UserInfo {
            role: Some(role.to_string()),
            ..UserInfo::default()
        }
    }

    fn filter() -> SpaceDataFilter {
        // No space URL configured, so permitted roles get the no-data message
        SpaceDataFilter::new(FilterConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_denied_role_gets_denial_message() {
        let filter = filter();
        let user = user_with_role("guest");

        let body = filter.inlet(RequestBody::default(), Some(&user)).await.unwrap();
        assert_eq!(body.messages.len(), 1);
        assert_eq!(body.messages[0].role, Role::Assistant);
        assert_eq!(body.messages[0].content, DENIED_MESSAGE);
    }

    #[tokio::test]
    async fn test_missing_user_is_denied() {
        let filter = filter();
        let body = filter.inlet(RequestBody::default(), None).await.unwrap();
        assert_eq!(body.messages[0].content, DENIED_MESSAGE);
    }

    #[tokio::test]
    async fn test_permitted_role_without_data_gets_notice() {
        let filter = filter();
        let user = user_with_role("admin");

        let body = filter.inlet(RequestBody::default(), Some(&user)).await.unwrap();
        assert_eq!(body.messages[0].content, NO_SPACES_MESSAGE);
    }

    #[tokio::test]
    async fn test_existing_messages_and_extra_fields_preserved() {
        let filter = filter();
        let user = user_with_role("guest");

        let mut body = RequestBody::default();
        body.messages.push(Message::user("hello"));
        body.extra.insert("stream".to_string(), serde_json::Value::Bool(false));

        let out = filter.inlet(body, Some(&user)).await.unwrap();
        assert_eq!(out.messages.len(), 2);
        assert_eq!(out.messages[0].content, "hello");
        assert_eq!(out.extra["stream"], false);
    }
}
