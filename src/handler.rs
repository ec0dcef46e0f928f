use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Deserialize;

use crate::{
    db::DbPool,
    models::{NewPost, Post},
};

pub async fn health() -> impl IntoResponse {
    Json("ok")
}

/// Incoming payload for post creation. Missing fields default to empty
/// strings; unknown fields, including a client-supplied id or timestamp,
/// are ignored.
#[derive(Debug, Deserialize)]
pub struct PostInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

pub async fn create_post(
    State(pool): State<DbPool>,
    payload: Result<Json<PostInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Post>), (StatusCode, String)> {
    use crate::schema::posts;

    let Json(input) = payload.map_err(bad_request)?;

    let mut conn = pool.get().map_err(internal_error)?;

    let new_post = NewPost {
        title: &input.title,
        body: &input.body,
    };

    // RETURNING hands back the generated id and created_at in the same
    // round trip as the insert.
    let post = diesel::insert_into(posts::table)
        .values(&new_post)
        .returning(Post::as_returning())
        .get_result(&mut conn)
        .map_err(internal_error)?;

    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn get_posts(
    State(pool): State<DbPool>,
) -> Result<Json<Vec<Post>>, (StatusCode, String)> {
    use crate::schema::posts::dsl::*;

    let mut conn = pool.get().map_err(internal_error)?;

    let results = posts
        .select(Post::as_select())
        .order(created_at.desc())
        .load(&mut conn)
        .map_err(internal_error)?;

    Ok(Json(results))
}

fn bad_request(err: JsonRejection) -> (StatusCode, String) {
    (
        StatusCode::BAD_REQUEST,
        format!("Invalid JSON: {}", err.body_text()),
    )
}

fn internal_error<E>(err: E) -> (StatusCode, String)
where
    E: std::error::Error,
{
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_defaults_missing_fields_to_empty_strings() {
        let input: PostInput = serde_json::from_str("{}").unwrap();
        assert_eq!(input.title, "");
        assert_eq!(input.body, "");

        let input: PostInput = serde_json::from_str(r#"{"title": "only title"}"#).unwrap();
        assert_eq!(input.title, "only title");
        assert_eq!(input.body, "");
    }

    #[test]
    fn input_ignores_client_supplied_id_and_timestamp() {
        let input: PostInput = serde_json::from_str(
            r#"{"id": 99, "title": "t", "body": "b", "created_at": "2024-01-01T00:00:00"}"#,
        )
        .unwrap();
        assert_eq!(input.title, "t");
        assert_eq!(input.body, "b");
    }

    #[test]
    fn internal_error_embeds_the_underlying_message() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "connection reset");
        let (status, message) = internal_error(err);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "connection reset");
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let response = health().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
