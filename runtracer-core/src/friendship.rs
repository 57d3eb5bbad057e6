//! Friend requests between users and the friend lists derived from them.
//!
//! A request starts out [`FriendshipStatus::Pending`]. Only the addressee may
//! accept it; either side may reject it, which also ends an accepted
//! friendship. A pair of users has at most one live (pending or accepted)
//! friendship regardless of who asked first. A rejected record no longer
//! blocks a fresh request; the new request replaces it.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Lifecycle state of a [`Friendship`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FriendshipStatus {
    /// Awaiting the addressee's answer.
    Pending,
    /// Both users are friends.
    Accepted,
    /// Declined, withdrawn, or ended.
    Rejected,
}

/// A friend request and its current state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Friendship {
    /// Identifier assigned by [`Friendships::request`].
    pub id: u64,
    /// User who sent the request.
    pub requester_id: String,
    /// User the request was sent to.
    pub addressee_id: String,
    /// Current state.
    pub status: FriendshipStatus,
    /// When the request was made.
    pub created_at: DateTime<Utc>,
}

impl Friendship {
    /// Whether `user_id` is either side of this friendship.
    #[must_use]
    pub fn involves(&self, user_id: &str) -> bool {
        self.requester_id == user_id || self.addressee_id == user_id
    }

    /// The user on the other side from `user_id`, if `user_id` takes part.
    #[must_use]
    pub fn other(&self, user_id: &str) -> Option<&str> {
        if self.requester_id == user_id {
            Some(&self.addressee_id)
        } else if self.addressee_id == user_id {
            Some(&self.requester_id)
        } else {
            None
        }
    }

    const fn is_live(&self) -> bool {
        matches!(
            self.status,
            FriendshipStatus::Pending | FriendshipStatus::Accepted
        )
    }

    fn joins(&self, a: &str, b: &str) -> bool {
        (self.requester_id == a && self.addressee_id == b)
            || (self.requester_id == b && self.addressee_id == a)
    }
}

/// Errors returned by [`Friendships`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FriendshipError {
    /// A user id was empty or whitespace.
    #[error("user id must not be blank")]
    BlankUser,
    /// Users cannot befriend themselves.
    #[error("user {0} cannot send a friend request to themselves")]
    SelfRequest(String),
    /// The pair already has a pending or accepted friendship.
    #[error("a friendship between {requester_id} and {addressee_id} already exists ({status:?})")]
    Duplicate {
        /// User attempting the request.
        requester_id: String,
        /// User the request was aimed at.
        addressee_id: String,
        /// State of the existing record.
        status: FriendshipStatus,
    },
    /// No friendship carries this id.
    #[error("friendship {0} not found")]
    NotFound(u64),
    /// The acting user is not the addressee of the request.
    #[error("user {user_id} cannot accept friendship {id}")]
    NotAddressee {
        /// Friendship id.
        id: u64,
        /// Acting user.
        user_id: String,
    },
    /// The acting user is not part of the friendship.
    #[error("user {user_id} is not part of friendship {id}")]
    NotParticipant {
        /// Friendship id.
        id: u64,
        /// Acting user.
        user_id: String,
    },
    /// The operation needs a pending request.
    #[error("friendship {id} is {status:?}, not pending")]
    NotPending {
        /// Friendship id.
        id: u64,
        /// Current state.
        status: FriendshipStatus,
    },
    /// The friendship has already been rejected.
    #[error("friendship {0} is already rejected")]
    AlreadyRejected(u64),
}

/// In-memory collection of friendships.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use runtracer_core::{FriendshipStatus, Friendships};
///
/// let mut book = Friendships::new();
/// let id = book.request("ana", "ben", Utc::now())?.id;
/// book.accept(id, "ben")?;
/// assert_eq!(book.friends_of("ana"), vec!["ben"]);
/// assert_eq!(book.get(id).map(|f| f.status), Some(FriendshipStatus::Accepted));
/// # Ok::<(), runtracer_core::FriendshipError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Friendships {
    records: Vec<Friendship>,
    next_id: u64,
}

impl Friendships {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a friendship by id.
    #[must_use]
    pub fn get(&self, id: u64) -> Option<&Friendship> {
        self.records.iter().find(|friendship| friendship.id == id)
    }

    /// Record a pending request from `requester_id` to `addressee_id`.
    ///
    /// # Errors
    ///
    /// Returns [`FriendshipError::BlankUser`] or
    /// [`FriendshipError::SelfRequest`] for invalid ids, and
    /// [`FriendshipError::Duplicate`] when the pair already has a pending or
    /// accepted friendship in either direction.
    pub fn request(
        &mut self,
        requester_id: &str,
        addressee_id: &str,
        created_at: DateTime<Utc>,
    ) -> Result<&Friendship, FriendshipError> {
        let requester_id = requester_id.trim();
        let addressee_id = addressee_id.trim();
        if requester_id.is_empty() || addressee_id.is_empty() {
            return Err(FriendshipError::BlankUser);
        }
        if requester_id == addressee_id {
            return Err(FriendshipError::SelfRequest(requester_id.to_owned()));
        }
        if let Some(existing) = self
            .records
            .iter()
            .find(|friendship| friendship.is_live() && friendship.joins(requester_id, addressee_id))
        {
            return Err(FriendshipError::Duplicate {
                requester_id: requester_id.to_owned(),
                addressee_id: addressee_id.to_owned(),
                status: existing.status,
            });
        }
        self.records
            .retain(|friendship| !friendship.joins(requester_id, addressee_id));

        self.next_id += 1;
        let index = self.records.len();
        self.records.push(Friendship {
            id: self.next_id,
            requester_id: requester_id.to_owned(),
            addressee_id: addressee_id.to_owned(),
            status: FriendshipStatus::Pending,
            created_at,
        });
        self.records.get(index).ok_or(FriendshipError::NotFound(self.next_id))
    }

    /// Accept a pending request on behalf of its addressee.
    ///
    /// # Errors
    ///
    /// Returns [`FriendshipError::NotFound`] for an unknown id,
    /// [`FriendshipError::NotAddressee`] when `user_id` did not receive the
    /// request, and [`FriendshipError::NotPending`] when it is no longer
    /// pending.
    pub fn accept(&mut self, id: u64, user_id: &str) -> Result<&Friendship, FriendshipError> {
        let friendship = self.find_mut(id)?;
        if friendship.addressee_id != user_id {
            return Err(FriendshipError::NotAddressee {
                id,
                user_id: user_id.to_owned(),
            });
        }
        if friendship.status != FriendshipStatus::Pending {
            return Err(FriendshipError::NotPending {
                id,
                status: friendship.status,
            });
        }
        friendship.status = FriendshipStatus::Accepted;
        Ok(friendship)
    }

    /// Reject a request or end a friendship on behalf of either side.
    ///
    /// # Errors
    ///
    /// Returns [`FriendshipError::NotFound`] for an unknown id,
    /// [`FriendshipError::NotParticipant`] when `user_id` is not part of it,
    /// and [`FriendshipError::AlreadyRejected`] when it is already rejected.
    pub fn reject(&mut self, id: u64, user_id: &str) -> Result<&Friendship, FriendshipError> {
        let friendship = self.find_mut(id)?;
        if !friendship.involves(user_id) {
            return Err(FriendshipError::NotParticipant {
                id,
                user_id: user_id.to_owned(),
            });
        }
        if friendship.status == FriendshipStatus::Rejected {
            return Err(FriendshipError::AlreadyRejected(id));
        }
        friendship.status = FriendshipStatus::Rejected;
        Ok(friendship)
    }

    /// Ids of users with an accepted friendship with `user_id`.
    #[must_use]
    pub fn friends_of(&self, user_id: &str) -> Vec<&str> {
        self.records
            .iter()
            .filter(|friendship| friendship.status == FriendshipStatus::Accepted)
            .filter_map(|friendship| friendship.other(user_id))
            .collect()
    }

    /// Pending requests sent to `user_id`.
    pub fn incoming<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a Friendship> + 'a {
        self.records.iter().filter(move |friendship| {
            friendship.status == FriendshipStatus::Pending && friendship.addressee_id == user_id
        })
    }

    /// Pending requests sent by `user_id`.
    pub fn outgoing<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a Friendship> + 'a {
        self.records.iter().filter(move |friendship| {
            friendship.status == FriendshipStatus::Pending && friendship.requester_id == user_id
        })
    }

    fn find_mut(&mut self, id: u64) -> Result<&mut Friendship, FriendshipError> {
        self.records
            .iter_mut()
            .find(|friendship| friendship.id == id)
            .ok_or(FriendshipError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 31, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn pending(book: &mut Friendships, from: &str, to: &str, now: DateTime<Utc>) -> u64 {
        book.request(from, to, now).expect("request accepted").id
    }

    #[rstest]
    fn request_starts_pending(now: DateTime<Utc>) {
        let mut book = Friendships::new();
        let friendship = book.request("ana", "ben", now).expect("request accepted");

        assert_eq!(friendship.status, FriendshipStatus::Pending);
        assert_eq!(friendship.requester_id, "ana");
        assert_eq!(friendship.addressee_id, "ben");
        assert_eq!(friendship.created_at, now);
    }

    #[rstest]
    #[case::same_direction("ana", "ben")]
    #[case::reverse_direction("ben", "ana")]
    fn duplicate_requests_are_rejected(
        now: DateTime<Utc>,
        #[case] from: &str,
        #[case] to: &str,
    ) {
        let mut book = Friendships::new();
        pending(&mut book, "ana", "ben", now);

        let err = book.request(from, to, now).expect_err("pair already linked");
        assert!(matches!(
            err,
            FriendshipError::Duplicate {
                status: FriendshipStatus::Pending,
                ..
            }
        ));
    }

    #[rstest]
    fn accepted_friendship_blocks_new_request(now: DateTime<Utc>) {
        let mut book = Friendships::new();
        let id = pending(&mut book, "ana", "ben", now);
        book.accept(id, "ben").expect("addressee accepts");

        let err = book.request("ben", "ana", now).expect_err("already friends");
        assert!(matches!(
            err,
            FriendshipError::Duplicate {
                status: FriendshipStatus::Accepted,
                ..
            }
        ));
    }

    #[rstest]
    #[case::self_request("ana", "ana", FriendshipError::SelfRequest("ana".to_owned()))]
    #[case::blank_addressee("ana", "  ", FriendshipError::BlankUser)]
    #[case::blank_requester("", "ben", FriendshipError::BlankUser)]
    fn invalid_requests_are_rejected(
        now: DateTime<Utc>,
        #[case] from: &str,
        #[case] to: &str,
        #[case] expected: FriendshipError,
    ) {
        let mut book = Friendships::new();
        assert_eq!(book.request(from, to, now).expect_err("invalid"), expected);
    }

    #[rstest]
    fn only_addressee_can_accept(now: DateTime<Utc>) {
        let mut book = Friendships::new();
        let id = pending(&mut book, "ana", "ben", now);

        let err = book.accept(id, "ana").expect_err("requester cannot accept");
        assert_eq!(
            err,
            FriendshipError::NotAddressee {
                id,
                user_id: "ana".to_owned()
            }
        );
        assert!(book.friends_of("ana").is_empty());
    }

    #[rstest]
    fn accepting_twice_fails(now: DateTime<Utc>) {
        let mut book = Friendships::new();
        let id = pending(&mut book, "ana", "ben", now);
        book.accept(id, "ben").expect("first accept");

        let err = book.accept(id, "ben").expect_err("already accepted");
        assert_eq!(
            err,
            FriendshipError::NotPending {
                id,
                status: FriendshipStatus::Accepted
            }
        );
    }

    #[rstest]
    fn unknown_ids_are_reported(now: DateTime<Utc>) {
        let mut book = Friendships::new();
        pending(&mut book, "ana", "ben", now);
        assert_eq!(book.accept(99, "ben"), Err(FriendshipError::NotFound(99)));
        assert_eq!(book.reject(99, "ben"), Err(FriendshipError::NotFound(99)));
    }

    #[rstest]
    #[case::declined_by_addressee("ben")]
    #[case::withdrawn_by_requester("ana")]
    fn either_side_can_reject(now: DateTime<Utc>, #[case] actor: &str) {
        let mut book = Friendships::new();
        let id = pending(&mut book, "ana", "ben", now);

        let rejected = book.reject(id, actor).expect("participant rejects");
        assert_eq!(rejected.status, FriendshipStatus::Rejected);
        assert_eq!(book.incoming("ben").count(), 0);
        assert_eq!(book.reject(id, actor), Err(FriendshipError::AlreadyRejected(id)));
    }

    #[rstest]
    fn outsiders_cannot_reject(now: DateTime<Utc>) {
        let mut book = Friendships::new();
        let id = pending(&mut book, "ana", "ben", now);
        assert_eq!(
            book.reject(id, "cat"),
            Err(FriendshipError::NotParticipant {
                id,
                user_id: "cat".to_owned()
            })
        );
    }

    #[rstest]
    fn rejected_pair_may_request_again(now: DateTime<Utc>) {
        let mut book = Friendships::new();
        let first = pending(&mut book, "ana", "ben", now);
        book.reject(first, "ben").expect("declined");

        let second = pending(&mut book, "ben", "ana", now);
        assert_ne!(first, second);
        assert!(book.get(first).is_none());
        assert_eq!(book.incoming("ana").map(|f| f.id).collect::<Vec<_>>(), vec![second]);
    }

    #[rstest]
    fn lists_friends_and_pending_requests(now: DateTime<Utc>) {
        let mut book = Friendships::new();
        let with_ben = pending(&mut book, "ana", "ben", now);
        let from_cat = pending(&mut book, "cat", "ana", now);
        pending(&mut book, "ana", "dan", now);
        book.accept(with_ben, "ben").expect("ben accepts");
        book.accept(from_cat, "ana").expect("ana accepts");
        pending(&mut book, "eve", "ana", now);

        assert_eq!(book.friends_of("ana"), vec!["ben", "cat"]);
        assert_eq!(book.friends_of("ben"), vec!["ana"]);
        let incoming: Vec<&str> = book
            .incoming("ana")
            .map(|f| f.requester_id.as_str())
            .collect();
        assert_eq!(incoming, vec!["eve"]);
        let outgoing: Vec<&str> = book
            .outgoing("ana")
            .map(|f| f.addressee_id.as_str())
            .collect();
        assert_eq!(outgoing, vec!["dan"]);
    }
}
