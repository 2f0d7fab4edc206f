use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;

use crate::error::{MoonlakeError, MoonlakeResult};

/// How a dream felt. Defaults to `Peaceful` when unset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    #[default]
    Peaceful,
    Adventurous,
    Mysterious,
    Scary,
    Happy,
    Sad,
}

impl Mood {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Peaceful => "peaceful",
            Self::Adventurous => "adventurous",
            Self::Mysterious => "mysterious",
            Self::Scary => "scary",
            Self::Happy => "happy",
            Self::Sad => "sad",
        }
    }
}

impl std::str::FromStr for Mood {
    type Err = MoonlakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "peaceful" => Ok(Self::Peaceful),
            "adventurous" => Ok(Self::Adventurous),
            "mysterious" => Ok(Self::Mysterious),
            "scary" => Ok(Self::Scary),
            "happy" => Ok(Self::Happy),
            "sad" => Ok(Self::Sad),
            other => Err(MoonlakeError::validation(format!("unknown mood '{other}'"))),
        }
    }
}

/// A saved dream. Immutable once saved; there is no edit or delete path.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub title: String,
    pub content: String,
    pub mood: Mood,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub companion_index: usize,
}

/// The single in-progress entry, preserved across editor open/close cycles.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DraftForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub mood: Mood,
    pub date: NaiveDate,
    #[serde(default)]
    pub companion_index: usize,
}

impl DraftForm {
    fn empty(date: NaiveDate, companion_index: usize) -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            mood: Mood::default(),
            date,
            companion_index,
        }
    }
}

/// A decorative character assigned to the editor session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Companion {
    pub name: &'static str,
    pub subtitle: &'static str,
    pub image: &'static str,
}

macro_rules! companion {
    ($name:literal, $subtitle:literal, $image:literal) => {
        Companion {
            name: $name,
            subtitle: $subtitle,
            image: $image,
        }
    };
}

pub const COMPANIONS: &[Companion] = &[
    companion!("Luna", "Guardian of peaceful dreams", "emojis/unicorn_1f984.webp"),
    companion!("Mochi", "Keeper of sweet memories", "emojis/rabbit-face_1f430.webp"),
    companion!("Cloud", "Drifter of dreamy skies", "emojis/bear_1f43b.webp"),
    companion!("Whisper", "Collector of midnight secrets", "emojis/fox_1f98a.webp"),
    companion!("Blossom", "Tender of garden dreams", "emojis/cat-face_1f431.webp"),
    companion!("Nimbus", "Shepherd of fluffy thoughts", "emojis/panda_1f43c.webp"),
    companion!("Twilight", "Guide through shadow realms", "emojis/owl_1f989.webp"),
    companion!("Honey", "Sweetener of nightmares", "emojis/honeybee_1f41d.webp"),
    companion!("Maple", "Painter of autumn visions", "emojis/dog-face_1f436.webp"),
    companion!("Clover", "Bringer of lucky dreams", "emojis/pig-face_1f437.webp"),
    companion!("Flicker", "Spark of inspiration", "emojis/butterfly_1f98b.webp"),
    companion!("Cocoa", "Warmer of cold nights", "emojis/hamster_1f439.webp"),
    companion!("Pebble", "Guardian of tiny wishes", "emojis/mouse-face_1f42d.webp"),
    companion!("Sage", "Ancient wisdom keeper", "emojis/turtle_1f422.webp"),
    companion!("Ember", "Keeper of warm memories", "emojis/tiger-face_1f42f.webp"),
    companion!("Frost", "Sculptor of ice castles", "emojis/polar-bear_1f43b-200d-2744-fe0f.webp"),
    companion!("Coral", "Singer of ocean lullabies", "emojis/tropical-fish_1f420.webp"),
    companion!("Dewdrop", "Morning's first kiss", "emojis/snail_1f40c.webp"),
    companion!("Petal", "Dancer in flower fields", "emojis/lady-beetle_1f41e.webp"),
    companion!("Koda", "Friend of the forest", "emojis/koala_1f428.webp"),
    companion!("Blaze", "Spirit of adventure", "emojis/lion_1f981.webp"),
    companion!("Waddle", "Explorer of icy lands", "emojis/penguin_1f427.webp"),
    companion!("Ribbit", "Hopper between dimensions", "emojis/frog_1f438.webp"),
    companion!("Chirp", "Messenger of dawn", "emojis/baby-chick_1f424.webp"),
    companion!("Orbit", "Traveler of cosmic seas", "emojis/spouting-whale_1f433.webp"),
    companion!("Starlight", "Weaver of cosmic adventures", "emojis/glowing-star_1f31f.webp"),
    companion!("Sunny", "Brightener of dark thoughts", "emojis/sun-with-face_1f31e.webp"),
    companion!("Rainbow", "Bridge to happy places", "emojis/rainbow_1f308.webp"),
    companion!("Sparkle", "Magic dust sprinkler", "emojis/sparkles_2728.webp"),
    companion!("Comet", "Wish granter from afar", "emojis/dizzy_1f4ab.webp"),
    companion!("Breezy", "Carrier of dream whispers", "emojis/cloud_2601-fe0f.webp"),
];

/// Record keys in the backing store.
const DRAFT_KEY: &str = "dreamJournalDraft";
const ENTRIES_KEY: &str = "dreamJournalDreams";

/// The persistence collaborator: two named records behind a get/set-by-key
/// string interface, values serialized as JSON.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> MoonlakeResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> MoonlakeResult<()>;
    fn remove(&mut self, key: &str) -> MoonlakeResult<()>;
}

/// Volatile store for tests and previews.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: BTreeMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> MoonlakeResult<Option<String>> {
        Ok(self.records.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> MoonlakeResult<()> {
        self.records.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> MoonlakeResult<()> {
        self.records.remove(key);
        Ok(())
    }
}

/// All records in one JSON document on disk, written through on every set.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    records: BTreeMap<String, String>,
}

impl FileStore {
    pub fn open(path: impl AsRef<Path>) -> MoonlakeResult<Self> {
        let path = path.as_ref().to_path_buf();
        let records = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| MoonlakeError::storage(format!("read '{}': {e}", path.display())))?;
            serde_json::from_str(&content)
                .map_err(|e| MoonlakeError::serde(format!("parse '{}': {e}", path.display())))?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, records })
    }

    fn persist(&self) -> MoonlakeResult<()> {
        let content = serde_json::to_string_pretty(&self.records)
            .map_err(|e| MoonlakeError::serde(e.to_string()))?;
        std::fs::write(&self.path, content)
            .map_err(|e| MoonlakeError::storage(format!("write '{}': {e}", self.path.display())))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> MoonlakeResult<Option<String>> {
        Ok(self.records.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> MoonlakeResult<()> {
        self.records.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove(&mut self, key: &str) -> MoonlakeResult<()> {
        if self.records.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}

/// The field a failed save wants focused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidField {
    Title,
    Content,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SaveOutcome {
    Saved(JournalEntry),
    /// Validation failed; nothing was persisted and the draft is untouched.
    Invalid(InvalidField),
}

/// The journal: an append-only entry sequence plus the single draft slot.
pub struct JournalStore<S: KeyValueStore, R: Rng> {
    store: S,
    rng: R,
    form: DraftForm,
    last_companion: Option<usize>,
}

impl<S: KeyValueStore, R: Rng> JournalStore<S, R> {
    pub fn new(store: S, rng: R, today: NaiveDate) -> Self {
        Self {
            store,
            rng,
            form: DraftForm::empty(today, 0),
            last_companion: None,
        }
    }

    pub fn form(&self) -> &DraftForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut DraftForm {
        &mut self.form
    }

    pub fn companion(&self) -> Companion {
        COMPANIONS[self.form.companion_index.min(COMPANIONS.len() - 1)]
    }

    /// Uniformly random companion, redrawn until it differs from the previous
    /// one (degenerates to index 0 when the roster has a single entry).
    fn pick_companion(&mut self) -> usize {
        let n = COMPANIONS.len();
        let index = if n <= 1 {
            0
        } else {
            loop {
                let candidate = self.rng.gen_range(0..n);
                if Some(candidate) != self.last_companion {
                    break candidate;
                }
            }
        };
        self.last_companion = Some(index);
        index
    }

    /// Open the editor: restore the draft (and its companion, keeping the
    /// assistant character stable across an edit session) if one exists,
    /// otherwise start fresh with a newly picked companion.
    pub fn open(&mut self, today: NaiveDate) -> MoonlakeResult<&DraftForm> {
        match self.load_draft()? {
            Some(draft) => {
                if draft.companion_index < COMPANIONS.len() {
                    self.last_companion = Some(draft.companion_index);
                    self.form = draft;
                } else {
                    let companion = self.pick_companion();
                    self.form = DraftForm {
                        companion_index: companion,
                        ..draft
                    };
                }
            }
            None => {
                let companion = self.pick_companion();
                self.form = DraftForm::empty(today, companion);
            }
        }
        tracing::debug!(companion = self.companion().name, "journal opened");
        Ok(&self.form)
    }

    /// Open the editor pre-seeded with a calendar date. Any existing draft is
    /// discarded.
    pub fn open_for_date(&mut self, date: NaiveDate) -> MoonlakeResult<&DraftForm> {
        self.store.remove(DRAFT_KEY)?;
        let companion = self.pick_companion();
        self.form = DraftForm::empty(date, companion);
        Ok(&self.form)
    }

    /// Close the editor, unconditionally persisting the current form as the
    /// draft (overwrite, not merge).
    pub fn close(&mut self) -> MoonlakeResult<()> {
        let json =
            serde_json::to_string(&self.form).map_err(|e| MoonlakeError::serde(e.to_string()))?;
        self.store.set(DRAFT_KEY, &json)
    }

    /// Validate and append. An empty title or content aborts without touching
    /// storage, reporting which field to focus. A successful save appends
    /// exactly one entry with a unique time-based id and clears the draft; the
    /// returned entry is the caller's cue to start the flight animation.
    pub fn save(&mut self, now: DateTime<Utc>) -> MoonlakeResult<SaveOutcome> {
        let title = self.form.title.trim().to_string();
        let content = self.form.content.trim().to_string();
        if title.is_empty() {
            return Ok(SaveOutcome::Invalid(InvalidField::Title));
        }
        if content.is_empty() {
            return Ok(SaveOutcome::Invalid(InvalidField::Content));
        }

        let mut entries = self.load_entries()?;
        let entry = JournalEntry {
            id: next_entry_id(&entries, now),
            title,
            content,
            mood: self.form.mood,
            date: self.form.date,
            created_at: now,
            companion_index: self.form.companion_index,
        };
        entries.push(entry.clone());
        self.save_entries(&entries)?;
        self.store.remove(DRAFT_KEY)?;
        tracing::debug!(id = %entry.id, total = entries.len(), "dream saved");
        Ok(SaveOutcome::Saved(entry))
    }

    /// Reset the form to defaults and delete the draft. Saved entries are
    /// untouched; the session gets a fresh companion.
    pub fn clear(&mut self, today: NaiveDate) -> MoonlakeResult<&DraftForm> {
        let companion = self.pick_companion();
        self.form = DraftForm::empty(today, companion);
        self.store.remove(DRAFT_KEY)?;
        Ok(&self.form)
    }

    /// All saved entries in save order.
    pub fn entries(&self) -> MoonlakeResult<Vec<JournalEntry>> {
        self.load_entries()
    }

    /// Entries whose date matches exactly, in save order.
    pub fn list_for_date(&self, date: NaiveDate) -> MoonlakeResult<Vec<JournalEntry>> {
        Ok(self
            .load_entries()?
            .into_iter()
            .filter(|e| e.date == date)
            .collect())
    }

    fn load_draft(&self) -> MoonlakeResult<Option<DraftForm>> {
        match self.store.get(DRAFT_KEY)? {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| MoonlakeError::serde(format!("draft record: {e}"))),
            None => Ok(None),
        }
    }

    fn load_entries(&self) -> MoonlakeResult<Vec<JournalEntry>> {
        match self.store.get(ENTRIES_KEY)? {
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| MoonlakeError::serde(format!("entries record: {e}"))),
            None => Ok(Vec::new()),
        }
    }

    fn save_entries(&mut self, entries: &[JournalEntry]) -> MoonlakeResult<()> {
        let json =
            serde_json::to_string(entries).map_err(|e| MoonlakeError::serde(e.to_string()))?;
        self.store.set(ENTRIES_KEY, &json)
    }
}

/// Millisecond timestamp, bumped monotonically past the newest existing id so
/// rapid saves never collide.
fn next_entry_id(entries: &[JournalEntry], now: DateTime<Utc>) -> String {
    let mut candidate = now.timestamp_millis();
    if let Some(last) = entries.last()
        && let Ok(last_id) = last.id.parse::<i64>()
        && candidate <= last_id
    {
        candidate = last_id + 1;
    }
    candidate.to_string()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;
    use rand::SeedableRng as _;
    use rand::rngs::StdRng;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 22, 30, 0).unwrap()
    }

    fn store() -> JournalStore<MemoryStore, StdRng> {
        JournalStore::new(MemoryStore::default(), StdRng::seed_from_u64(7), today())
    }

    fn fill(journal: &mut JournalStore<MemoryStore, StdRng>, title: &str, content: &str) {
        journal.form_mut().title = title.to_string();
        journal.form_mut().content = content.to_string();
    }

    #[test]
    fn save_rejects_empty_title_then_content() {
        let mut journal = store();
        journal.open(today()).unwrap();

        fill(&mut journal, "", "drifting over water");
        assert_eq!(
            journal.save(now()).unwrap(),
            SaveOutcome::Invalid(InvalidField::Title)
        );

        fill(&mut journal, "  \t ", "drifting over water");
        assert_eq!(
            journal.save(now()).unwrap(),
            SaveOutcome::Invalid(InvalidField::Title)
        );

        fill(&mut journal, "Flight", "   ");
        assert_eq!(
            journal.save(now()).unwrap(),
            SaveOutcome::Invalid(InvalidField::Content)
        );

        assert!(journal.entries().unwrap().is_empty());
    }

    #[test]
    fn invalid_save_keeps_the_draft() {
        let mut journal = store();
        journal.open(today()).unwrap();
        fill(&mut journal, "", "content without a title");
        journal.close().unwrap();

        assert_eq!(
            journal.save(now()).unwrap(),
            SaveOutcome::Invalid(InvalidField::Title)
        );
        // The persisted draft survives an aborted save.
        journal.open(today()).unwrap();
        assert_eq!(journal.form().content, "content without a title");
    }

    #[test]
    fn valid_save_appends_once_and_clears_the_draft() {
        let mut journal = store();
        journal.open(today()).unwrap();
        fill(&mut journal, "  Lake at dusk ", " mirrored pines ");
        journal.close().unwrap();

        let SaveOutcome::Saved(entry) = journal.save(now()).unwrap() else {
            panic!("expected a saved entry");
        };
        assert_eq!(entry.title, "Lake at dusk");
        assert_eq!(entry.content, "mirrored pines");
        assert_eq!(entry.mood, Mood::Peaceful);
        assert_eq!(journal.entries().unwrap().len(), 1);

        // Draft gone: reopening starts fresh.
        journal.open(today()).unwrap();
        assert!(journal.form().title.is_empty());
    }

    #[test]
    fn rapid_saves_get_unique_monotonic_ids() {
        let mut journal = store();
        let mut ids = Vec::new();
        for i in 0..5 {
            journal.open(today()).unwrap();
            fill(&mut journal, &format!("dream {i}"), "again");
            let SaveOutcome::Saved(entry) = journal.save(now()).unwrap() else {
                panic!("expected a saved entry");
            };
            ids.push(entry.id.parse::<i64>().unwrap());
        }
        for w in ids.windows(2) {
            assert!(w[1] > w[0], "ids not strictly increasing: {ids:?}");
        }
    }

    #[test]
    fn list_for_date_filters_exactly_in_save_order() {
        let mut journal = store();
        let other = NaiveDate::from_ymd_opt(2024, 6, 16).unwrap();

        for (title, date) in [("a", today()), ("b", other), ("c", today())] {
            journal.open_for_date(date).unwrap();
            fill(&mut journal, title, "x");
            journal.save(now()).unwrap();
        }

        let hits = journal.list_for_date(today()).unwrap();
        assert_eq!(
            hits.iter().map(|e| e.title.as_str()).collect::<Vec<_>>(),
            vec!["a", "c"]
        );
        assert!(journal.list_for_date(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn close_then_open_restores_form_and_companion() {
        let mut journal = store();
        journal.open(today()).unwrap();
        let companion = journal.form().companion_index;

        fill(&mut journal, "Recurring", "the owl again");
        journal.form_mut().mood = Mood::Mysterious;
        journal.close().unwrap();

        // A fresh session over the same records.
        let mut journal = JournalStore::new(
            std::mem::take(&mut journal.store),
            StdRng::seed_from_u64(99),
            today(),
        );
        journal.open(today()).unwrap();
        assert_eq!(journal.form().title, "Recurring");
        assert_eq!(journal.form().content, "the owl again");
        assert_eq!(journal.form().mood, Mood::Mysterious);
        assert_eq!(journal.form().companion_index, companion);
    }

    #[test]
    fn clear_resets_the_form_and_deletes_the_draft_only() {
        let mut journal = store();
        journal.open(today()).unwrap();
        fill(&mut journal, "keep", "me");
        journal.save(now()).unwrap();

        journal.open(today()).unwrap();
        fill(&mut journal, "scratch", "pad");
        journal.close().unwrap();

        journal.clear(today()).unwrap();
        assert!(journal.form().title.is_empty());
        assert_eq!(journal.form().mood, Mood::Peaceful);
        // Saved entries untouched, draft gone.
        assert_eq!(journal.entries().unwrap().len(), 1);
        journal.open(today()).unwrap();
        assert!(journal.form().title.is_empty());
    }

    #[test]
    fn companion_redraw_avoids_the_previous_pick() {
        let mut journal = store();
        journal.open(today()).unwrap();
        let mut previous = journal.form().companion_index;
        for _ in 0..50 {
            journal.clear(today()).unwrap();
            let next = journal.form().companion_index;
            assert_ne!(next, previous);
            previous = next;
        }
    }

    #[test]
    fn open_for_date_discards_the_draft_and_seeds_the_date() {
        let mut journal = store();
        journal.open(today()).unwrap();
        fill(&mut journal, "left", "over");
        journal.close().unwrap();

        let picked = NaiveDate::from_ymd_opt(2024, 6, 20).unwrap();
        journal.open_for_date(picked).unwrap();
        assert_eq!(journal.form().date, picked);
        assert!(journal.form().title.is_empty());

        journal.open(today()).unwrap();
        assert!(journal.form().title.is_empty(), "draft should be gone");
    }

    #[test]
    fn mood_parses_its_lowercase_names() {
        assert_eq!("mysterious".parse::<Mood>().unwrap(), Mood::Mysterious);
        assert!("grumpy".parse::<Mood>().is_err());
        let json = serde_json::to_string(&Mood::Scary).unwrap();
        assert_eq!(json, "\"scary\"");
    }
}
