//! Closed status vocabularies for the assignment pipeline.
//!
//! The fixed business statuses are compile-time enums so an invalid key is
//! caught where the key is chosen. The database status catalog
//! (`main_statuses` / `sub_statuses` tables) supplies only the open-ended
//! parts: the numeric id used as a foreign key and the display label.
//! Status keys must never be hard-coded as strings outside this module.

macro_rules! define_status_keys {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $key:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// All variants, in declaration order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            /// The stable catalog key for this status.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $key ),+
                }
            }

            /// Parse a catalog key. Returns `None` for unknown keys; callers
            /// holding user-supplied input surface that as a validation error.
            pub fn parse(key: &str) -> Option<$name> {
                match key {
                    $( $key => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

define_status_keys! {
    /// Coarse-grained pipeline stage.
    MainStatusKey {
        Nominated => "nominated",
        Screening => "screening",
        Interview => "interview",
        Processing => "processing",
        Placed => "placed",
    }
}

define_status_keys! {
    /// Fine-grained state within a main status.
    SubStatusKey {
        NominatedInitial => "nominated_initial",
        DocumentsSubmitted => "documents_submitted",
        DocumentsVerified => "documents_verified",
        ScreeningPending => "screening_pending",
        ScreeningPassed => "screening_passed",
        ScreeningFailed => "screening_failed",
        InterviewAssigned => "interview_assigned",
        InterviewScheduled => "interview_scheduled",
        InterviewPassed => "interview_passed",
        InterviewFailed => "interview_failed",
        ProcessingStarted => "processing_started",
        PlacementConfirmed => "placement_confirmed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_status_round_trips() {
        for &key in SubStatusKey::ALL {
            assert_eq!(SubStatusKey::parse(key.as_str()), Some(key));
        }
    }

    #[test]
    fn main_status_round_trips() {
        for &key in MainStatusKey::ALL {
            assert_eq!(MainStatusKey::parse(key.as_str()), Some(key));
        }
    }

    #[test]
    fn unknown_key_rejected() {
        assert_eq!(SubStatusKey::parse("interview_schedule"), None);
        assert_eq!(SubStatusKey::parse(""), None);
        assert_eq!(MainStatusKey::parse("hired"), None);
    }

    #[test]
    fn interview_keys_are_distinct_literals() {
        // Downstream read models key on these exact strings.
        assert_eq!(SubStatusKey::InterviewAssigned.as_str(), "interview_assigned");
        assert_eq!(SubStatusKey::InterviewScheduled.as_str(), "interview_scheduled");
    }

    #[test]
    fn screening_family_present() {
        assert!(SubStatusKey::ALL
            .iter()
            .filter(|k| k.as_str().starts_with("screening_"))
            .count() >= 3);
    }
}
