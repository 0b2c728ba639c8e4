use conduit_core::prelude::*;
use serde_json::json;

pub mod models {
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug)]
    pub struct Post {
        #[serde(rename = "userId")]
        pub user_id: u32,
        pub id: u32,
        pub title: String,
        pub body: String,
    }

    #[derive(Serialize, Deserialize, Debug)]
    pub struct NewPost {
        pub title: String,
        pub body: String,
        #[serde(rename = "userId")]
        pub user_id: u32,
    }
}

/// Small typed wrapper over the jsonplaceholder API, showing the intended
/// shape of client code built on the pipeline.
pub struct PostsApi<T: Transport = ReqwestTransport> {
    conduit: Conduit<T>,
}

impl PostsApi<ReqwestTransport> {
    pub fn new() -> Self {
        Self {
            conduit: Conduit::new(
                ConduitConfig::new().base_url("https://jsonplaceholder.typicode.com"),
            ),
        }
    }
}

impl Default for PostsApi<ReqwestTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> PostsApi<T> {
    pub fn with_transport(config: ConduitConfig, transport: T) -> Self {
        Self {
            conduit: Conduit::with_transport(config, transport),
        }
    }

    pub fn conduit(&self) -> &Conduit<T> {
        &self.conduit
    }

    pub async fn get_post(&self, id: u32) -> Result<models::Post, FxError> {
        let resp = self.conduit.get(format!("/posts/{id}")).await?;
        Ok(resp.data_as()?)
    }

    pub async fn create_post(&self, new: &models::NewPost) -> Result<models::Post, FxError> {
        let body = serde_json::to_value(new)?;
        let resp = self.conduit.post("/posts", body).await?;
        Ok(resp.data_as()?)
    }

    pub async fn set_title(&self, id: u32, title: &str) -> Result<models::Post, FxError> {
        let resp = self
            .conduit
            .patch(format!("/posts/{id}"), json!({ "title": title }))
            .await?;
        Ok(resp.data_as()?)
    }

    pub async fn delete_post(&self, id: u32) -> Result<(), FxError> {
        self.conduit.delete(format!("/posts/{id}")).await?;
        Ok(())
    }
}
