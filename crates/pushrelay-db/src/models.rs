/// Row of `user_push_tokens`. Same column names as the hosted table so the
/// PostgREST response deserializes into it directly.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct PushTokenRow {
    pub fcm_token: Option<String>,
}
