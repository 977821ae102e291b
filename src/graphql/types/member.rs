use async_graphql::*;

use crate::database::entities::members;

#[derive(SimpleObject, Clone)]
pub struct Member {
    pub id: ID,
    pub google_id: Option<String>,
    pub project_id: Option<ID>,
    pub email: String,
    pub nickname: String,
    pub is_active: bool,
}

impl From<members::Model> for Member {
    fn from(model: members::Model) -> Self {
        Self {
            id: ID(model.id.to_string()),
            google_id: model.google_id,
            project_id: model.project_id.map(|id| ID(id.to_string())),
            email: model.email,
            nickname: model.nickname,
            is_active: model.is_active,
        }
    }
}
