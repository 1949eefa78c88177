use crate::{AudioBlob, AudioEffectData, Id, PrimaryKey, TimelineClipData};

pub type ClipSourceId = Id<ClipSource>;

/// A clip that can be dragged onto the timeline
#[derive(Debug, Clone, PartialEq)]
pub struct ClipSource {
    pub id: ClipSourceId,
    pub name: String,
    pub payload: ClipPayload,
    /// In seconds
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClipPayload {
    /// A built-in effect from the backend's catalog
    Effect {
        effect_id: PrimaryKey,
        audio_data: String,
    },
    /// A file the user uploaded, encoded as base64
    Upload { audio_data: String },
}

impl ClipSource {
    pub fn from_effect(effect: &AudioEffectData) -> Self {
        Self {
            id: Id::new(),
            name: effect.name.clone(),
            payload: ClipPayload::Effect {
                effect_id: effect.id.clone(),
                audio_data: effect.audio_data.clone(),
            },
            duration: effect.duration,
        }
    }

    /// The duration of an upload is not measured, a default is given instead
    pub fn from_upload(name: impl Into<String>, blob: &AudioBlob, duration: f64) -> Self {
        Self {
            id: Id::new(),
            name: name.into(),
            payload: ClipPayload::Upload {
                audio_data: blob.to_base64(),
            },
            duration,
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.payload, ClipPayload::Effect { .. })
    }

    pub fn audio_data(&self) -> &str {
        match &self.payload {
            ClipPayload::Effect { audio_data, .. } => audio_data,
            ClipPayload::Upload { audio_data } => audio_data,
        }
    }

    /// Describes the clip as it is placed at the given position
    pub fn to_clip_data(&self, position: f64) -> TimelineClipData {
        let effect_id = match &self.payload {
            ClipPayload::Effect { effect_id, .. } => Some(effect_id.clone()),
            ClipPayload::Upload { .. } => None,
        };

        TimelineClipData {
            name: self.name.clone(),
            audio_data: Some(self.audio_data().to_string()),
            effect_id,
            position,
            duration: self.duration,
        }
    }
}

/// The clips a user can pick from: built-in effects first, then their own uploads.
#[derive(Debug, Default)]
pub struct ClipLibrary {
    effects: Vec<ClipSource>,
    uploads: Vec<ClipSource>,
}

impl ClipLibrary {
    /// Replaces the built-in effects with a freshly fetched catalog
    pub fn set_effects(&mut self, effects: &[AudioEffectData]) {
        self.effects = effects.iter().map(ClipSource::from_effect).collect();
    }

    /// Adds an uploaded clip, returning its id
    pub fn add_upload(&mut self, name: impl Into<String>, blob: &AudioBlob, duration: f64) -> ClipSourceId {
        let source = ClipSource::from_upload(name, blob, duration);
        let id = source.id;

        self.uploads.push(source);
        id
    }

    pub fn get(&self, id: ClipSourceId) -> Option<&ClipSource> {
        self.iter().find(|s| s.id == id)
    }

    /// Finds a clip by name, ignoring case
    pub fn find_by_name(&self, name: &str) -> Option<&ClipSource> {
        self.iter().find(|s| s.name.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClipSource> {
        self.effects.iter().chain(self.uploads.iter())
    }

    pub fn effects(&self) -> &[ClipSource] {
        &self.effects
    }

    pub fn uploads(&self) -> &[ClipSource] {
        &self.uploads
    }
}
