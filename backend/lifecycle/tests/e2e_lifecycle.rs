//! End-to-end: a component click travels decode → ownership check → payload
//! cache → handler → event bus → lifecycle tracker, and the tracker walks
//! the full review lifecycle to archive.

use std::sync::Arc;
use std::time::Duration;

use plotforge_core::{
    ClosureEvent, CreationRecord, PlotContext, PlotError, PlotEvent, PlotEventKind, PlotRecord,
    PlotStatus, PlotStore, ReviewEvent, UndoEvent,
};
use plotforge_interactions::{
    ButtonRoute, ComponentClick, ForwardDisposition, InteractionCache, InteractionSettings,
};
use plotforge_lifecycle::{LifecycleTracker, MemoryNotifier, MemoryStore};

const OWNER: u64 = 4242;
const TRACKING_MESSAGE: u64 = 999_888_777_666;

/// Command instance the approve button is bound to; publishes onto the bus.
struct ApproveCommand {
    ctx: Arc<PlotContext>,
}

struct PendingReview {
    plot_id: u32,
}

fn approve_handler(
    command: &ApproveCommand,
    _click: &ComponentClick,
    payload: Arc<PendingReview>,
) -> anyhow::Result<()> {
    let event = PlotEvent::new(
        payload.plot_id,
        PlotEventKind::Review(ReviewEvent::Approved),
    );
    command.ctx.bus().dispatch(&event);
    Ok(())
}

fn creation(owner: u64) -> CreationRecord {
    CreationRecord {
        owner,
        status: PlotStatus::OnGoing,
        project: "city-1".into(),
        region: "eu".into(),
        coords: (48.1371, 11.5754),
    }
}

#[tokio::test]
async fn click_drives_lifecycle_to_archive() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .try_init();

    let ctx = Arc::new(PlotContext::new());
    let notifier = Arc::new(MemoryNotifier::default());
    let tracker = Arc::new(LifecycleTracker::new(notifier.clone()));
    ctx.bus().subscribe(tracker.subscriber()).unwrap();

    // The plot exists in the backing store, keyed by its tracking message.
    let store = MemoryStore::default();
    store.insert(PlotRecord {
        plot_id: 1,
        tracking_message_id: TRACKING_MESSAGE,
        owner: OWNER,
        status: PlotStatus::OnGoing,
    });

    // Create and submit.
    ctx.bus().dispatch(&ctx.created(1, creation(OWNER)));
    ctx.bus()
        .dispatch(&PlotEvent::new(1, PlotEventKind::Submitted));
    assert_eq!(tracker.status_of(1), Some(PlotStatus::Finished));

    // The review command sends an approve button: it resolves the plot from
    // the tracking message and caches the pending review for the interaction.
    let cache = Arc::new(InteractionCache::new(InteractionSettings::default()));
    let record = store
        .find_by_tracking_id(TRACKING_MESSAGE)
        .await
        .unwrap()
        .expect("tracked plot");
    let interaction = 555_000_111;
    cache
        .put(
            interaction,
            PendingReview {
                plot_id: record.plot_id,
            },
        )
        .await;

    let route = ButtonRoute::new(
        "plotforge",
        "review_approve",
        Arc::new(ApproveCommand { ctx: ctx.clone() }),
        cache,
        approve_handler,
    );
    let custom_id = route.custom_id(TRACKING_MESSAGE, record.owner).encode();

    // A stranger's click never reaches the handler.
    let stranger = ComponentClick {
        custom_id: custom_id.clone(),
        actor: 1,
        interaction,
    };
    assert_eq!(
        route.handle(&stranger).await.unwrap(),
        ForwardDisposition::BadOwner
    );
    assert_eq!(tracker.status_of(1), Some(PlotStatus::Finished));

    // The owner's click approves the plot through the bus.
    let owner_click = ComponentClick {
        custom_id,
        actor: record.owner,
        interaction,
    };
    assert_eq!(
        route.handle(&owner_click).await.unwrap(),
        ForwardDisposition::Forwarded
    );
    assert_eq!(tracker.status_of(1), Some(PlotStatus::Approved));

    // Archive closes the lifecycle.
    ctx.bus().dispatch(&PlotEvent::new(
        1,
        PlotEventKind::Closure(ClosureEvent::Archived { owner: OWNER }),
    ));
    assert_eq!(tracker.status_of(1), Some(PlotStatus::Archived));

    // Undoing a review after archival is outside the transition table: the
    // tracker rejects it and keeps the archived status.
    let undo = PlotEvent::new(1, PlotEventKind::Undo(UndoEvent::UndoReview));
    assert!(matches!(
        tracker.observe(&undo),
        Err(PlotError::UnknownTransition { from: PlotStatus::Archived, .. })
    ));
    let outcome = ctx.bus().dispatch(&undo);
    assert_eq!(outcome.failed, 1);
    assert_eq!(tracker.status_of(1), Some(PlotStatus::Archived));

    // Review and closure outcomes were pushed through the notifier seam.
    tokio::time::sleep(Duration::from_millis(50)).await;
    let sent = notifier.sent();
    assert!(sent.iter().any(|(id, text)| *id == 1 && text.contains("Approved")));
    assert!(sent.iter().any(|(id, text)| *id == 1 && text.contains("Archived")));
}
