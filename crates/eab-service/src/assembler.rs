//! Per-contact query result assembly.

use eab_core::{ContactCapability, ContactUri, EabCapabilityResult, EabError, EabQueryStatus};

/// What a lookup found for one contact, before it is turned into a result.
#[derive(Debug)]
pub enum LookupOutcome {
    /// Stored and within its TTL.
    Fresh(ContactCapability),
    /// Stored but stale. `reason` decides the status, normally
    /// [`EabError::ExpiredData`].
    Expired {
        capability: ContactCapability,
        reason: EabError,
    },
    /// Nothing usable: unresolved, never stored, or a store failure.
    Failed(EabError),
}

/// Builds [`EabCapabilityResult`]s.
///
/// Never fails: every condition is encoded in the status. Payloads are
/// re-addressed to the identifier the caller queried.
pub struct QueryResultAssembler;

impl QueryResultAssembler {
    /// Assembles the result for `queried`.
    #[must_use]
    pub fn assemble(queried: &ContactUri, outcome: LookupOutcome) -> EabCapabilityResult {
        match outcome {
            LookupOutcome::Fresh(capability) => EabCapabilityResult::new(
                queried.clone(),
                EabQueryStatus::QuerySuccessful,
                Some(capability.with_contact_uri(queried.clone())),
            ),
            LookupOutcome::Expired { capability, reason } => EabCapabilityResult::new(
                queried.clone(),
                EabQueryStatus::from(&reason),
                Some(capability.with_contact_uri(queried.clone())),
            ),
            LookupOutcome::Failed(err) => {
                EabCapabilityResult::new(queried.clone(), EabQueryStatus::from(&err), None)
            }
        }
    }

    /// Result for a query made after the controller was destroyed.
    #[must_use]
    pub fn destroyed(queried: &ContactUri) -> EabCapabilityResult {
        EabCapabilityResult::new(queried.clone(), EabQueryStatus::ControllerDestroyed, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eab_core::{PresenceTuple, RequestResult, SourceType};

    fn stored() -> ContactCapability {
        let stored_uri = ContactUri::parse("sip:+16661234567@ims.example").unwrap();
        ContactCapability::presence_builder(stored_uri.clone(), SourceType::Network, RequestResult::Found)
            .add_capability_tuple(
                PresenceTuple::builder("open", "org.3gpp.mmtel", "1.0")
                    .contact_uri(stored_uri)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap()
    }

    fn queried() -> ContactUri {
        ContactUri::parse("16661234567@android.test").unwrap()
    }

    #[test]
    fn test_fresh_echoes_queried_uri() {
        let result = QueryResultAssembler::assemble(&queried(), LookupOutcome::Fresh(stored()));

        assert_eq!(result.status(), EabQueryStatus::QuerySuccessful);
        assert_eq!(result.contact_uri(), &queried());
        let payload = result.contact_capabilities().unwrap();
        assert_eq!(payload.contact_uri(), &queried());
        assert_eq!(payload.tuples()[0].contact_uri(), Some(&queried()));
    }

    #[test]
    fn test_expired_keeps_payload() {
        let outcome = LookupOutcome::Expired {
            capability: stored(),
            reason: EabError::ExpiredData("16661234567@android.test".into()),
        };
        let result = QueryResultAssembler::assemble(&queried(), outcome);

        assert_eq!(result.status(), EabQueryStatus::ContactExpired);
        assert!(result.is_stale());
        assert_eq!(result.contact_capabilities().unwrap().contact_uri(), &queried());
    }

    #[test]
    fn test_failures_carry_no_payload() {
        let cases = [
            (EabError::UnresolvedIdentifier("x".into()), EabQueryStatus::NotFound),
            (EabError::MissingData("x".into()), EabQueryStatus::NotFound),
            (EabError::storage("disk full"), EabQueryStatus::StorageError),
        ];
        for (err, expected) in cases {
            let result = QueryResultAssembler::assemble(&queried(), LookupOutcome::Failed(err));
            assert_eq!(result.status(), expected);
            assert!(result.contact_capabilities().is_none());
        }
    }

    #[test]
    fn test_destroyed() {
        let result = QueryResultAssembler::destroyed(&queried());
        assert_eq!(result.status(), EabQueryStatus::ControllerDestroyed);
        assert!(result.contact_capabilities().is_none());
    }
}
