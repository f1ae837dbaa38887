//! Workspace entity types.

use casal_shared::types::{
    AgreementId, CardId, CoupleId, ExpenseId, ProfileId, SettlementId, TagId, UserId,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::key::{EntityKey, EntityKind};

/// A shared expense paid by one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Expense ID.
    pub id: ExpenseId,
    /// Owning workspace.
    pub couple_id: CoupleId,
    /// What was bought.
    pub description: String,
    /// Amount paid, in the workspace currency.
    pub amount: Decimal,
    /// Profile that paid.
    pub paid_by: ProfileId,
    /// Date of the expense.
    pub date: NaiveDate,
    /// Tags applied to the expense.
    #[serde(default)]
    pub tag_ids: Vec<TagId>,
    /// Card used to pay, if any.
    #[serde(default)]
    pub card_id: Option<CardId>,
}

/// A member profile inside a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Profile ID.
    pub id: ProfileId,
    /// Owning workspace.
    pub couple_id: CoupleId,
    /// Linked identity; absent for profiles not yet claimed by a member.
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Display name.
    pub name: String,
    /// Color token.
    #[serde(default)]
    pub color: Option<String>,
}

/// A label grouping expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag ID.
    pub id: TagId,
    /// Owning workspace.
    pub couple_id: CoupleId,
    /// Display name, unique within the workspace.
    pub name: String,
    /// Color token.
    #[serde(default)]
    pub color: Option<String>,
}

/// A payment card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Card ID.
    pub id: CardId,
    /// Owning workspace.
    pub couple_id: CoupleId,
    /// Display name, unique within the workspace.
    pub name: String,
    /// Color token.
    #[serde(default)]
    pub color: Option<String>,
    /// Profile holding the card.
    #[serde(default)]
    pub owner: Option<ProfileId>,
    /// Day of month the statement closes.
    #[serde(default)]
    pub closing_day: Option<u8>,
    /// Day of month the statement is due.
    #[serde(default)]
    pub due_day: Option<u8>,
}

/// One profile's share under an agreement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgreementShare {
    /// Profile bearing the share.
    pub profile_id: ProfileId,
    /// Share of each covered expense, in percent.
    pub percent: Decimal,
}

/// How a set of expenses is split between profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agreement {
    /// Agreement ID.
    pub id: AgreementId,
    /// Owning workspace.
    pub couple_id: CoupleId,
    /// Short title.
    pub title: String,
    /// Shares; must add up to 100 percent.
    pub shares: Vec<AgreementShare>,
    /// Expenses split under this agreement.
    #[serde(default)]
    pub expense_ids: Vec<ExpenseId>,
}

/// A payment from one profile to another settling shared expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Settlement ID.
    pub id: SettlementId,
    /// Owning workspace.
    pub couple_id: CoupleId,
    /// Profile paying.
    pub from: ProfileId,
    /// Profile being paid.
    pub to: ProfileId,
    /// Amount paid.
    pub amount: Decimal,
    /// Date of the payment.
    pub date: NaiveDate,
    /// Expenses this payment refers to.
    #[serde(default)]
    pub expense_ids: Vec<ExpenseId>,
}

/// Any workspace entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Entity {
    /// An expense.
    Expense(Expense),
    /// A member profile.
    Profile(Profile),
    /// A tag.
    Tag(Tag),
    /// A payment card.
    Card(Card),
    /// A split agreement.
    Agreement(Agreement),
    /// A settlement.
    Settlement(Settlement),
}

impl Entity {
    /// Returns the entity kind.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Expense(_) => EntityKind::Expense,
            Self::Profile(_) => EntityKind::Profile,
            Self::Tag(_) => EntityKind::Tag,
            Self::Card(_) => EntityKind::Card,
            Self::Agreement(_) => EntityKind::Agreement,
            Self::Settlement(_) => EntityKind::Settlement,
        }
    }

    /// Returns the storage key of the entity.
    #[must_use]
    pub const fn key(&self) -> EntityKey {
        let id = match self {
            Self::Expense(e) => e.id.into_inner(),
            Self::Profile(p) => p.id.into_inner(),
            Self::Tag(t) => t.id.into_inner(),
            Self::Card(c) => c.id.into_inner(),
            Self::Agreement(a) => a.id.into_inner(),
            Self::Settlement(s) => s.id.into_inner(),
        };
        EntityKey::new(self.kind(), id)
    }

    /// Returns the workspace the entity claims to belong to.
    #[must_use]
    pub const fn couple_id(&self) -> CoupleId {
        match self {
            Self::Expense(e) => e.couple_id,
            Self::Profile(p) => p.couple_id,
            Self::Tag(t) => t.couple_id,
            Self::Card(c) => c.couple_id,
            Self::Agreement(a) => a.couple_id,
            Self::Settlement(s) => s.couple_id,
        }
    }
}

macro_rules! entity_key {
    ($ty:ident, $kind:ident) => {
        impl $ty {
            /// Returns the storage key of this entity.
            #[must_use]
            pub const fn key(&self) -> EntityKey {
                EntityKey::new(EntityKind::$kind, self.id.into_inner())
            }
        }

        impl From<$ty> for Entity {
            fn from(value: $ty) -> Self {
                Self::$kind(value)
            }
        }
    };
}

entity_key!(Expense, Expense);
entity_key!(Profile, Profile);
entity_key!(Tag, Tag);
entity_key!(Card, Card);
entity_key!(Agreement, Agreement);
entity_key!(Settlement, Settlement);

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn expense(couple_id: CoupleId) -> Expense {
        Expense {
            id: ExpenseId::new(),
            couple_id,
            description: "Mercado".to_string(),
            amount: dec!(120.50),
            paid_by: ProfileId::new(),
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            tag_ids: vec![],
            card_id: None,
        }
    }

    #[test]
    fn test_entity_key_matches_variant() {
        let couple_id = CoupleId::new();
        let e = expense(couple_id);
        let key = e.key();
        let entity = Entity::from(e);
        assert_eq!(entity.kind(), EntityKind::Expense);
        assert_eq!(entity.key(), key);
        assert_eq!(entity.couple_id(), couple_id);
    }

    #[test]
    fn test_entity_serializes_with_type_tag() {
        let entity = Entity::from(Tag {
            id: TagId::new(),
            couple_id: CoupleId::new(),
            name: "Casa".to_string(),
            color: Some("#ff8800".to_string()),
        });
        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["type"], "tag");
        assert_eq!(json["name"], "Casa");

        let back: Entity = serde_json::from_value(json).unwrap();
        assert_eq!(back, entity);
    }

    #[test]
    fn test_load_order_ranks_are_sequential() {
        for (rank, kind) in EntityKind::LOAD_ORDER.iter().enumerate() {
            assert_eq!(usize::from(kind.load_rank()), rank);
        }
    }
}
