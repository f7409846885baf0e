//! Authorization policy shared by every mutating operation

use crate::domain::value_objects::ObjectId;

/// A resource with a single owning user
pub trait Owned {
    fn owner(&self) -> ObjectId;
}

/// Caller is not allowed to perform `action`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("You are not allowed to {action}")]
pub struct Forbidden {
    pub action: &'static str,
}

/// Fail unless `caller` owns `resource`
pub fn ensure_owner<R: Owned + ?Sized>(
    resource: &R,
    caller: ObjectId,
    action: &'static str,
) -> Result<(), Forbidden> {
    if resource.owner() == caller { Ok(()) } else { Err(Forbidden { action }) }
}

/// Fail unless the requested user is the caller
pub fn ensure_self(
    requested: ObjectId,
    caller: ObjectId,
    action: &'static str,
) -> Result<(), Forbidden> {
    if requested == caller { Ok(()) } else { Err(Forbidden { action }) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Comment;

    #[test]
    fn test_owner_passes_and_stranger_fails() {
        let owner = ObjectId::new();
        let comment = Comment::new(ObjectId::new(), owner, "hi".into());

        assert!(ensure_owner(&comment, owner, "edit this comment").is_ok());

        let err = ensure_owner(&comment, ObjectId::new(), "edit this comment").unwrap_err();
        assert_eq!(err.to_string(), "You are not allowed to edit this comment");
    }

    #[test]
    fn test_ensure_self() {
        let me = ObjectId::new();
        assert!(ensure_self(me, me, "view subscribers").is_ok());
        assert!(ensure_self(ObjectId::new(), me, "view subscribers").is_err());
    }
}
