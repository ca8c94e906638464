//! Posting boundary and outcome write-back
//!
//! The engine never posts clearing transactions itself; it hands each
//! clearing group to an [`ItemPoster`] implementation and records the
//! outcome on the originating rows. Failed groups are annotated and
//! skipped, never retried: retry policy belongs to the posting
//! collaborator.

use crate::types::{ClearingGroup, ClearingInput, LedgerItem, PostingError};
use tracing::{info, warn};

/// Message written to rows of a successfully posted group
const CLEARED_MESSAGE: &str = "Successfully cleared.";

/// External posting collaborator
///
/// Implementations submit one clearing group per call and return the
/// resulting posting reference number, or a [`PostingError`] describing
/// why the group could not be posted.
pub trait ItemPoster {
    /// Post one (account, currency) clearing group
    ///
    /// # Returns
    ///
    /// The posting reference number assigned by the external system.
    fn post_group(
        &mut self,
        entity: &str,
        account: &str,
        currency: &str,
        group: &ClearingGroup,
    ) -> Result<String, PostingError>;
}

/// Post every group of an entity's clearing input and record outcomes
///
/// Groups are posted in (account, currency) order. A successful call
/// writes the posting number and a success message onto the group's
/// rows; a failed call writes a failure message and processing continues
/// with the next group. Both outcomes leave the rest of the run
/// untouched.
///
/// # Returns
///
/// The number of groups that were posted successfully.
pub fn clear_open_items(
    items: &mut [LedgerItem],
    input: &ClearingInput,
    entity: &str,
    poster: &mut dyn ItemPoster,
) -> usize {
    let mut posted = 0;

    for (account, currency, group) in input.groups() {
        info!(
            "posting {} items on account '{}' in {} for entity '{}'",
            group.len(),
            account,
            currency,
            entity
        );

        match poster.post_group(entity, account, currency, group) {
            Ok(number) => {
                for &i in &group.indexes {
                    items[i].posting_number = Some(number.clone());
                    items[i].message = CLEARED_MESSAGE.to_string();
                }
                info!("items posted under document number '{}'", number);
                posted += 1;
            }
            Err(err) => {
                warn!(
                    "posting failed for account '{}' in {}: {}",
                    account, currency, err
                );
                for &i in &group.indexes {
                    items[i].message = format!("Clearing error: {}", err);
                }
            }
        }
    }

    posted
}
