// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// Manages a generic, thread-safe event channel.
///
/// The bus owns one end of each side. Subscribers receive clones of the
/// receiver, which share a single queue: every event is delivered to exactly
/// one of them.
#[derive(Debug)]
pub struct EventBus<T: Clone + Send + 'static> {
    sender: flume::Sender<T>,
    receiver: flume::Receiver<T>,
}

impl<T: Clone + Send + 'static> EventBus<T> {
    /// Creates a new EventBus holding at most `capacity` undelivered events.
    /// Events published while it is full are dropped.
    pub fn bounded(capacity: usize) -> Self {
        let (sender, receiver) = flume::bounded(capacity);
        log::debug!("EventBus initialized with capacity {capacity}.");
        Self { sender, receiver }
    }

    /// Publishes an event without blocking.
    ///
    /// Returns `false` if the event was dropped.
    pub fn publish(&self, event: T) -> bool {
        log::trace!("Publishing an event.");

        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(flume::TrySendError::Full(_)) => {
                log::warn!("EventBus is full, dropping event. Is anyone draining it?");
                false
            }
            Err(flume::TrySendError::Disconnected(_)) => {
                log::error!("Failed to send event: receiver disconnected.");
                false
            }
        }
    }

    /// Returns a receiver for the bus's queue.
    pub fn subscribe(&self) -> flume::Receiver<T> {
        self.receiver.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flume::TryRecvError;
    use std::{thread, time::Duration};

    #[derive(Debug, Clone, PartialEq)]
    enum TestEvent {
        AdapterLost { index: i32 },
        DriverReset,
    }

    #[test]
    fn publish_then_receive_in_order() {
        let bus = EventBus::<TestEvent>::bounded(8);
        let receiver = bus.subscribe();

        assert!(bus.publish(TestEvent::AdapterLost { index: 1 }));
        assert!(bus.publish(TestEvent::DriverReset));

        assert_eq!(
            receiver.recv_timeout(Duration::from_millis(50)),
            Ok(TestEvent::AdapterLost { index: 1 })
        );
        assert_eq!(receiver.try_recv(), Ok(TestEvent::DriverReset));
        assert_eq!(receiver.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn bounded_bus_drops_when_full() {
        let bus = EventBus::<TestEvent>::bounded(1);
        assert!(bus.publish(TestEvent::DriverReset));
        assert!(!bus.publish(TestEvent::AdapterLost { index: 0 }));

        let receiver = bus.subscribe();
        assert_eq!(receiver.len(), 1);
        assert_eq!(receiver.try_recv(), Ok(TestEvent::DriverReset));
        assert!(bus.publish(TestEvent::AdapterLost { index: 2 }));
    }

    #[test]
    fn receive_from_another_thread() {
        let bus = EventBus::<TestEvent>::bounded(8);
        let receiver = bus.subscribe();

        let handle = thread::spawn(move || {
            receiver
                .recv_timeout(Duration::from_secs(1))
                .expect("Receive from thread failed")
        });

        bus.publish(TestEvent::DriverReset);
        assert_eq!(handle.join().expect("Thread join failed"), TestEvent::DriverReset);
    }
}
