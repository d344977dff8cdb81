//! Event bridge - Delivers "item added" notifications from the host page to a
//! page view-model.
//!
//! The host keeps a [`Notifier`] and raises one notification per created row.
//! The page owns the matching [`Subscription`], drains it when asked and
//! tears it down explicitly with [`Subscription::unsubscribe`].

use crate::{
    entities::{IngredientUsage, IngredientWithPrice},
    errors::{Error, Result},
};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, error::TryRecvError};
use tracing::{debug, trace};

/// Notification raised after a usage was added to the product being edited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageAdded {
    /// The newly created usage
    #[serde(rename = "ingredientUsage")]
    pub ingredient_usage: IngredientUsage,
}

/// Notification raised after an ingredient was created on the ingredients page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientAdded {
    /// The newly created ingredient with its price
    #[serde(rename = "newIngredient")]
    pub new_ingredient: IngredientWithPrice,
}

/// Creates a connected notifier/subscription pair.
#[must_use]
pub fn channel<P>() -> (Notifier<P>, Subscription<P>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (Notifier { sender }, Subscription { receiver })
}

/// Sending half, held by the host.
#[derive(Debug)]
pub struct Notifier<P> {
    sender: UnboundedSender<P>,
}

impl<P> Clone for Notifier<P> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<P> Notifier<P> {
    /// Queues a notification for the subscribed page.
    ///
    /// # Errors
    /// Returns `SubscriptionClosed` once the page unsubscribed or was dropped.
    pub fn notify(&self, payload: P) -> Result<()> {
        self.sender
            .send(payload)
            .map_err(|_| Error::SubscriptionClosed)
    }

    /// Whether the subscription is gone.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Receiving half, owned by the page view-model.
#[derive(Debug)]
pub struct Subscription<P> {
    receiver: UnboundedReceiver<P>,
}

impl<P> Subscription<P> {
    /// Takes the next queued notification without waiting.
    pub fn try_next(&mut self) -> Option<P> {
        match self.receiver.try_recv() {
            Ok(payload) => {
                trace!("Received notification");
                Some(payload)
            }
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Waits for the next notification. Returns None once every notifier is
    /// dropped or the subscription was torn down and drained.
    pub async fn next(&mut self) -> Option<P> {
        self.receiver.recv().await
    }

    /// Stops accepting notifications. Already queued ones can still be taken.
    pub fn unsubscribe(&mut self) {
        debug!("Unsubscribing from item-added notifications");
        self.receiver.close();
    }

    /// Number of queued notifications.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }
}
