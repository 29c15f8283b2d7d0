mod tests {
    use myrtio_lifx_bulb::{ActionQueue, Hsbk, POWER_OFF, POWER_ON, TransitionRequest};

    fn color(brightness: u16) -> TransitionRequest {
        TransitionRequest::color(Hsbk::new(0, 0, brightness, 3500), 100)
    }

    #[test]
    fn test_fifo_order() {
        let queue: ActionQueue<4> = ActionQueue::new();
        let sender = queue.sender();
        let receiver = queue.receiver();

        sender.send(TransitionRequest::power(POWER_ON, 0));
        sender.send(color(1));
        sender.send(TransitionRequest::power(POWER_OFF, 250));
        assert_eq!(queue.len(), 3);

        assert_eq!(receiver.try_receive(), Some(TransitionRequest::power(POWER_ON, 0)));
        assert_eq!(receiver.try_receive(), Some(color(1)));
        assert_eq!(receiver.try_receive(), Some(TransitionRequest::power(POWER_OFF, 250)));
        assert_eq!(receiver.try_receive(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_full_queue_displaces_oldest_color() {
        let queue: ActionQueue<2> = ActionQueue::new();

        assert_eq!(queue.enqueue(color(1)), None);
        assert_eq!(queue.enqueue(color(2)), None);
        assert_eq!(queue.enqueue(color(3)), Some(color(1)));

        assert_eq!(queue.try_next(), Some(color(2)));
        assert_eq!(queue.try_next(), Some(color(3)));
    }

    #[test]
    fn test_full_queue_keeps_power_changes() {
        let queue: ActionQueue<3> = ActionQueue::new();
        let off = TransitionRequest::power(POWER_OFF, 0);

        queue.enqueue(off);
        queue.enqueue(color(1));
        queue.enqueue(color(2));
        assert_eq!(queue.enqueue(color(3)), Some(color(1)));
        assert_eq!(queue.enqueue(color(4)), Some(color(2)));

        assert_eq!(queue.try_next(), Some(off));
        assert_eq!(queue.try_next(), Some(color(3)));
        assert_eq!(queue.try_next(), Some(color(4)));
    }

    #[test]
    fn test_full_of_power_changes_drops_superseded_one() {
        let queue: ActionQueue<2> = ActionQueue::new();
        let on = TransitionRequest::power(POWER_ON, 0);
        let off = TransitionRequest::power(POWER_OFF, 0);

        queue.enqueue(off);
        queue.enqueue(on);
        assert_eq!(queue.enqueue(color(1)), Some(off));

        assert_eq!(queue.try_next(), Some(on));
        assert_eq!(queue.try_next(), Some(color(1)));
    }

    #[test]
    fn test_lone_power_change_is_never_dropped_for_color() {
        let queue: ActionQueue<1> = ActionQueue::new();
        let off = TransitionRequest::power(POWER_OFF, 0);

        queue.enqueue(off);
        assert_eq!(queue.enqueue(color(1)), Some(color(1)));
        assert_eq!(queue.enqueue(TransitionRequest::power(POWER_ON, 0)), Some(off));
        assert_eq!(queue.try_next(), Some(TransitionRequest::power(POWER_ON, 0)));
    }

    #[test]
    fn test_senders_from_threads() {
        static QUEUE: ActionQueue<64> = ActionQueue::new();

        std::thread::scope(|scope| {
            for thread in 0..4u16 {
                scope.spawn(move || {
                    let sender = QUEUE.sender();
                    for i in 0..8 {
                        sender.send(color(thread * 100 + i));
                    }
                });
            }
        });

        assert_eq!(QUEUE.len(), 32);
    }

    #[test]
    fn test_duration_is_milliseconds() {
        let TransitionRequest::ColorChange { duration, .. } = color(0) else {
            panic!("expected a color change");
        };
        assert_eq!(duration.as_micros(), 100_000);
    }
}
