//! Card collection seam.
//!
//! The surrounding application owns storage of the card collection. The crop
//! tool only needs to load it, replace one card's image with a committed
//! redress, and save it back, so storage is abstracted behind
//! [`CardRepository`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::DecodedImage;
use crate::encode::{encode_jpeg, EncodeError};

/// Errors from the card repository.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No card at the requested position.
    #[error("No card at index {index} (collection has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// The image could not be encoded for storage.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// The backing store rejected the operation.
    #[error("Card storage failed: {0}")]
    Storage(String),
}

/// One archived card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub title: String,
    /// JPEG bytes of the card image, if one has been captured.
    pub image: Option<Vec<u8>>,
}

impl Card {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            image: None,
        }
    }
}

/// Load/save access to the card collection.
pub trait CardRepository {
    fn load(&self) -> Result<Vec<Card>, RepositoryError>;

    fn save(&mut self, cards: &[Card]) -> Result<(), RepositoryError>;
}

/// Repository held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    cards: Vec<Card>,
}

impl MemoryRepository {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

impl CardRepository for MemoryRepository {
    fn load(&self) -> Result<Vec<Card>, RepositoryError> {
        Ok(self.cards.clone())
    }

    fn save(&mut self, cards: &[Card]) -> Result<(), RepositoryError> {
        self.cards = cards.to_vec();
        Ok(())
    }
}

/// Encode `image` as JPEG and store it as the image of card `index`.
///
/// The collection is reloaded before the write, and nothing is saved when
/// encoding fails.
///
/// # Errors
///
/// Returns an error if `index` is out of range, the image cannot be
/// encoded, or the repository fails to load or save.
pub fn store_card_image<R: CardRepository + ?Sized>(
    repo: &mut R,
    index: usize,
    image: &DecodedImage,
    quality: u8,
) -> Result<(), RepositoryError> {
    let mut cards = repo.load()?;
    let len = cards.len();
    let card = cards
        .get_mut(index)
        .ok_or(RepositoryError::IndexOutOfRange { index, len })?;

    let bytes = encode_jpeg(image, quality)?;
    log::debug!("storing {} byte image on card {}", bytes.len(), index);
    card.image = Some(bytes);

    repo.save(&cards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_image;

    fn gray(width: u32, height: u32) -> DecodedImage {
        DecodedImage::new(width, height, vec![128; (width * height * 3) as usize])
    }

    /// Repository whose saves always fail.
    struct ReadOnly(Vec<Card>);

    impl CardRepository for ReadOnly {
        fn load(&self) -> Result<Vec<Card>, RepositoryError> {
            Ok(self.0.clone())
        }

        fn save(&mut self, _cards: &[Card]) -> Result<(), RepositoryError> {
            Err(RepositoryError::Storage("read-only".into()))
        }
    }

    #[test]
    fn test_memory_round_trip() {
        let mut repo = MemoryRepository::default();
        assert!(repo.load().unwrap().is_empty());

        repo.save(&[Card::new("a"), Card::new("b")]).unwrap();
        let cards = repo.load().unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1].title, "b");
    }

    #[test]
    fn test_store_card_image_replaces_only_target() {
        let mut repo = MemoryRepository::new(vec![Card::new("front"), Card::new("back")]);
        store_card_image(&mut repo, 1, &gray(16, 8), 90).unwrap();

        let cards = repo.cards();
        assert!(cards[0].image.is_none());
        let stored = decode_image(cards[1].image.as_deref().unwrap()).unwrap();
        assert_eq!((stored.width, stored.height), (16, 8));
    }

    #[test]
    fn test_store_card_image_index_out_of_range() {
        let mut repo = MemoryRepository::new(vec![Card::new("only")]);
        let err = store_card_image(&mut repo, 3, &gray(4, 4), 90).unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::IndexOutOfRange { index: 3, len: 1 }
        ));
    }

    #[test]
    fn test_store_card_image_encode_failure_leaves_repo() {
        let mut repo = MemoryRepository::new(vec![Card::new("x")]);
        let empty = DecodedImage::new(0, 0, vec![]);
        let err = store_card_image(&mut repo, 0, &empty, 90).unwrap_err();
        assert!(matches!(err, RepositoryError::Encode(_)));
        assert!(repo.cards()[0].image.is_none());
    }

    #[test]
    fn test_store_card_image_propagates_save_error() {
        let mut repo = ReadOnly(vec![Card::new("x")]);
        let err = store_card_image(&mut repo, 0, &gray(2, 2), 90).unwrap_err();
        assert_eq!(err.to_string(), "Card storage failed: read-only");
    }
}
