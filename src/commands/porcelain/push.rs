use crate::areas::refs::MASTER_REF;
use crate::areas::remote::Remote;
use crate::areas::repository::Repository;
use crate::artifacts::graph::closure::ObjectClosure;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::pack::builder::PackBuilder;
use crate::artifacts::pack::pkt_line;
use bytes::{BufMut, BytesMut};
use std::io::Write;

/// Macro for debug logging that is enabled with the debug_push feature flag
///
/// # Usage
/// ```rust,ignore
/// debug_log!("Pushing {} objects", count);
/// ```
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(any(feature = "debug_push"))]
        {
            eprintln!($($arg)*);
        }
    };
}

/// Acknowledgment token the remote sends after a successful unpack
const UNPACK_OK: &str = "unpack ok";

/// Terminal state of a push the remote actually judged
///
/// Transport failures never produce an outcome; they surface as errors
/// before the remote had a chance to accept or reject the update. A
/// rejection means the pack arrived and was turned down, so retrying
/// without renegotiating refs will not help.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    /// The remote unpacked the objects and acknowledged the ref update
    Success { remote_response: String },
    /// The remote received the pack but did not acknowledge the unpack
    Rejected { remote_response: String },
}

impl Repository {
    /// Send the local master branch to a remote repository
    ///
    /// Discovers the remote master tip, packs every object reachable locally
    /// but not from the remote tip, and posts the negotiation line plus pack
    /// stream. Local state is never modified; a failed push leaves both sides
    /// where they were.
    pub async fn push(
        &mut self,
        url: &str,
        username: &str,
        password: &str,
    ) -> anyhow::Result<PushOutcome> {
        let local_tip = self
            .refs()
            .read_head()?
            .ok_or_else(|| anyhow::anyhow!("Nothing to push: the repository has no commits yet"))?;

        let remote = Remote::new(url.to_string(), username.to_string(), password.to_string());
        let remote_tip = remote.discover_master().await?;

        let closure = ObjectClosure::new(self.database());
        let missing_objects = closure.missing_objects(&local_tip, remote_tip.as_ref())?;
        debug_log!(
            "pushing {} object(s) to {}",
            missing_objects.len(),
            remote.url()
        );

        let pack = PackBuilder::new(self.database()).build(&missing_objects)?;

        let old_oid = remote_tip.unwrap_or_else(ObjectId::zero);
        let negotiation_line = format!("{} {} {}\0report-status", old_oid, local_tip, MASTER_REF);

        let mut payload = BytesMut::new();
        payload.put(pkt_line::encode(&[&negotiation_line]));
        payload.put(pack);

        let response = remote.send_pack(payload.freeze()).await?;
        debug_log!("remote replied: {}", response.trim_end());

        if response.contains(UNPACK_OK) {
            writeln!(self.writer(), "Push successful")?;
            Ok(PushOutcome::Success {
                remote_response: response,
            })
        } else {
            writeln!(self.writer(), "Push failed")?;
            Ok(PushOutcome::Rejected {
                remote_response: response,
            })
        }
    }
}
