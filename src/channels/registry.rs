use uuid::Uuid;

use crate::{
    model::{Channel, Document, Message},
    AppError, AppResult,
};

/// Channel id for a display name: lower-cased, with everything outside
/// `[a-z0-9_-]` replaced by `-`.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '_' | '-' => c,
            _ => '-',
        })
        .collect()
}

fn channel_not_found() -> AppError {
    AppError::NotFound("channel not found".into())
}

impl Document {
    pub fn channel(&self, id: &str) -> Option<&Channel> {
        self.channels.iter().find(|channel| channel.id == id)
    }

    fn channel_mut(&mut self, id: &str) -> Option<&mut Channel> {
        self.channels.iter_mut().find(|channel| channel.id == id)
    }

    pub fn create_channel(&mut self, name: &str, owner: Option<String>) -> AppResult<Channel> {
        if name.is_empty() {
            return Err(AppError::BadRequest("name required".into()));
        }

        let id = slugify(name);
        if self.channel(&id).is_some() {
            return Err(AppError::Conflict("channel exists".into()));
        }

        let channel = Channel {
            id,
            name: name.to_owned(),
            owner,
            messages: Vec::new(),
        };
        self.channels.push(channel.clone());
        Ok(channel)
    }

    /// Removes a channel and its messages. Owned channels may only be removed
    /// by their owner; unowned ones by anybody. An empty owner counts as none.
    pub fn delete_channel(&mut self, id: &str, requester: Option<&str>) -> AppResult<Channel> {
        let index = self
            .channels
            .iter()
            .position(|channel| channel.id == id)
            .ok_or_else(|| AppError::NotFound("not found".into()))?;

        let owner = self.channels[index].owner.as_deref().filter(|owner| !owner.is_empty());
        if owner.is_some_and(|owner| requester != Some(owner)) {
            return Err(AppError::Forbidden("forbidden".into()));
        }

        Ok(self.channels.remove(index))
    }

    pub fn messages(&self, channel_id: &str) -> AppResult<&[Message]> {
        self.channel(channel_id)
            .map(|channel| channel.messages.as_slice())
            .ok_or_else(channel_not_found)
    }

    pub fn post_message(&mut self, channel_id: &str, text: &str) -> AppResult<Message> {
        if text.is_empty() {
            return Err(AppError::BadRequest("text required".into()));
        }
        let channel = self.channel_mut(channel_id).ok_or_else(channel_not_found)?;

        let message = Message {
            id: Uuid::now_v7().to_string(),
            text: text.to_owned(),
        };
        channel.messages.push(message.clone());
        Ok(message)
    }

    pub fn delete_message(&mut self, channel_id: &str, message_id: &str) -> AppResult<Message> {
        let channel = self.channel_mut(channel_id).ok_or_else(channel_not_found)?;
        let index = channel
            .messages
            .iter()
            .position(|message| message.id == message_id)
            .ok_or_else(|| AppError::NotFound("message not found".into()))?;

        Ok(channel.messages.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with(name: &str, owner: Option<&str>) -> Document {
        let mut doc = Document::default();
        doc.create_channel(name, owner.map(str::to_owned)).unwrap();
        doc
    }

    #[test]
    fn slugify_restricts_characters() {
        assert_eq!(slugify("General Chat!"), "general-chat-");
        assert_eq!(slugify("rust_lang-2024"), "rust_lang-2024");
        assert_eq!(slugify("Café"), "caf-");
    }

    #[test]
    fn slugify_replaces_each_char_once() {
        assert_eq!(slugify("😀"), "-");
        assert_eq!(slugify("Hi 😀"), "hi--");
    }

    #[test]
    fn legacy_empty_owner_is_unowned() {
        let mut doc = doc_with("lobby", None);
        doc.channels[0].owner = Some(String::new());

        let removed = doc.delete_channel("lobby", None).unwrap();
        assert_eq!(removed.id, "lobby");
        assert!(doc.channels.is_empty());
    }

    #[test]
    fn create_channel_sets_id_and_owner() {
        let mut doc = Document::default();
        let channel = doc.create_channel("General Chat!", Some("alice".into())).unwrap();

        assert_eq!(channel.id, "general-chat-");
        assert_eq!(channel.name, "General Chat!");
        assert_eq!(channel.owner.as_deref(), Some("alice"));
        assert_eq!(doc.channels, vec![channel]);
    }

    #[test]
    fn create_channel_rejects_slug_collision() {
        let mut doc = doc_with("General Chat!", None);

        let err = doc.create_channel("general chat?", None).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(doc.channels.len(), 1);
    }

    #[test]
    fn create_channel_rejects_empty_name() {
        let mut doc = Document::default();
        assert!(matches!(doc.create_channel("", None), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn delete_owned_channel_requires_owner() {
        let mut doc = doc_with("general", Some("alice"));

        assert!(matches!(doc.delete_channel("general", Some("bob")), Err(AppError::Forbidden(_))));
        assert!(matches!(doc.delete_channel("general", None), Err(AppError::Forbidden(_))));
        assert!(doc.channel("general").is_some());

        doc.delete_channel("general", Some("alice")).unwrap();
        assert!(doc.channel("general").is_none());
    }

    #[test]
    fn delete_unowned_channel_is_open() {
        let mut doc = doc_with("general", None);
        doc.delete_channel("general", None).unwrap();
        assert!(doc.channels.is_empty());
    }

    #[test]
    fn delete_missing_channel() {
        let mut doc = Document::default();
        let err = doc.delete_channel("nope", Some("alice")).unwrap_err();
        assert_eq!(err.to_string(), "not found");
    }

    #[test]
    fn post_message_appends_in_order() {
        let mut doc = doc_with("general", None);
        let first = doc.post_message("general", "hello").unwrap();
        let second = doc.post_message("general", "world").unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(doc.messages("general").unwrap(), &[first, second]);
    }

    #[test]
    fn post_message_validates_before_lookup() {
        let mut doc = doc_with("general", None);

        let err = doc.post_message("missing", "").unwrap_err();
        assert_eq!(err.to_string(), "text required");

        let err = doc.post_message("missing", "hi").unwrap_err();
        assert_eq!(err.to_string(), "channel not found");
        assert!(doc.messages("general").unwrap().is_empty());
    }

    #[test]
    fn delete_message_keeps_sibling_order() {
        let mut doc = doc_with("general", None);
        let a = doc.post_message("general", "a").unwrap();
        let b = doc.post_message("general", "b").unwrap();
        let c = doc.post_message("general", "c").unwrap();

        let removed = doc.delete_message("general", &b.id).unwrap();

        assert_eq!(removed, b);
        assert_eq!(doc.messages("general").unwrap(), &[a, c]);
    }

    #[test]
    fn delete_message_not_found() {
        let mut doc = doc_with("general", None);

        let err = doc.delete_message("general", "nope").unwrap_err();
        assert_eq!(err.to_string(), "message not found");
        let err = doc.delete_message("missing", "nope").unwrap_err();
        assert_eq!(err.to_string(), "channel not found");
    }
}
