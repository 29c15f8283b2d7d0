mod tests {
    use embassy_time::{Duration, Instant};
    use myrtio_lifx_bulb::color::hsbk_to_rgb;
    use myrtio_lifx_bulb::{
        BulbConfig, BulbContext, Hsbk, Message, MessageKind, OutputDriver, POWER_OFF, POWER_ON,
        Payload, Rgb,
    };

    #[derive(Default)]
    struct RecordingDriver {
        frames: Vec<Rgb>,
    }

    impl OutputDriver for RecordingDriver {
        type Error = ();

        fn write(&mut self, color: Rgb) -> Result<(), Self::Error> {
            self.frames.push(color);
            Ok(())
        }
    }

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    fn set_color(color: Hsbk, duration_ms: u32) -> Message {
        Message::new(
            MessageKind::LightSetColor,
            Payload::LightSetColor { color, duration_ms },
        )
    }

    fn set_power(level: u16, duration_ms: u32) -> Message {
        Message::new(
            MessageKind::LightSetPower,
            Payload::LightSetPower { level, duration_ms },
        )
    }

    #[test]
    fn test_set_color_end_to_end() {
        let bulb: BulbContext = BulbContext::new(&BulbConfig::default(), at(0));
        let dispatcher = bulb.dispatcher();
        let mut scheduler = bulb.scheduler(RecordingDriver::default());

        let start = Hsbk::new(0, 0, 0, 3500);
        let target = Hsbk::new(32768, 65535, 65535, 3500);
        assert_eq!(bulb.store().get().color, start);
        assert_eq!(bulb.store().get().power, POWER_OFF);

        dispatcher.handle(&set_color(target, 1000), at(0)).unwrap();

        scheduler.tick(at(0)).unwrap();
        assert_eq!(scheduler.engine().current(), start);
        assert_eq!(scheduler.engine().output().frames, [hsbk_to_rgb(start)]);

        scheduler.tick(at(500)).unwrap();
        let halfway = scheduler.engine().current();
        assert_eq!(halfway.hue, 16384);
        // Target stays what was asked, rendered is in between
        assert_eq!(bulb.store().get().color, target);
        assert_eq!(bulb.store().rendered(), halfway);

        scheduler.tick(at(1000)).unwrap();
        assert_eq!(scheduler.engine().current(), target);
        assert_eq!(
            scheduler.engine().output().frames.last(),
            Some(&hsbk_to_rgb(target))
        );
    }

    #[test]
    fn test_power_cycle_end_to_end() {
        let config = BulbConfig {
            power: POWER_ON,
            ..BulbConfig::default()
        };
        let bulb: BulbContext = BulbContext::new(&config, at(0));
        let dispatcher = bulb.dispatcher();
        let mut scheduler = bulb.scheduler(RecordingDriver::default());

        dispatcher
            .handle(&set_color(Hsbk::new(0, 0, 40000, 3500), 0), at(0))
            .unwrap();
        scheduler.tick(at(0)).unwrap();

        dispatcher.handle(&set_power(POWER_OFF, 200), at(20)).unwrap();
        scheduler.tick(at(20)).unwrap();
        scheduler.tick(at(220)).unwrap();
        assert_eq!(scheduler.engine().current().brightness, 0);
        // Power does not touch the target color
        assert_eq!(bulb.store().get().color.brightness, 40000);

        dispatcher.handle(&set_power(POWER_ON, 200), at(240)).unwrap();
        scheduler.tick(at(240)).unwrap();
        scheduler.tick(at(440)).unwrap();
        assert_eq!(scheduler.engine().current().brightness, 40000);
    }

    #[test]
    fn test_power_cycle_from_initially_off_bulb() {
        let bulb: BulbContext = BulbContext::new(&BulbConfig::default(), at(0));
        let dispatcher = bulb.dispatcher();
        let mut scheduler = bulb.scheduler(RecordingDriver::default());

        // A color command lights the bulb even though power reads off
        dispatcher
            .handle(&set_color(Hsbk::new(0, 0, 40000, 3500), 0), at(0))
            .unwrap();
        scheduler.tick(at(0)).unwrap();
        assert_eq!(scheduler.engine().current().brightness, 40000);

        dispatcher.handle(&set_power(POWER_OFF, 0), at(20)).unwrap();
        scheduler.tick(at(20)).unwrap();
        assert_eq!(scheduler.engine().current().brightness, 0);

        dispatcher.handle(&set_power(POWER_ON, 0), at(40)).unwrap();
        scheduler.tick(at(40)).unwrap();
        assert_eq!(scheduler.engine().current().brightness, 40000);
        assert_eq!(bulb.store().rendered().brightness, 40000);
    }

    #[test]
    fn test_power_off_survives_full_queue() {
        let config = BulbConfig {
            power: POWER_ON,
            color: Hsbk::new(0, 0, 40000, 3500),
            ..BulbConfig::default()
        };
        let bulb: BulbContext<4> = BulbContext::new(&config, at(0));
        let dispatcher = bulb.dispatcher();
        let mut scheduler = bulb.scheduler(RecordingDriver::default());

        for hue in 1..=4 {
            dispatcher
                .handle(&set_color(Hsbk::new(hue, 0, 40000, 3500), 0), at(0))
                .unwrap();
        }
        dispatcher.handle(&set_power(POWER_OFF, 0), at(0)).unwrap();
        assert_eq!(bulb.actions().len(), 4);

        scheduler.tick(at(0)).unwrap();
        assert_eq!(scheduler.engine().current().brightness, 0);
        assert_eq!(scheduler.engine().last_brightness(), 40000);
        assert_eq!(bulb.store().get().power, POWER_OFF);
    }

    #[test]
    fn test_power_off_followed_by_burst_of_colors() {
        let config = BulbConfig {
            power: POWER_ON,
            color: Hsbk::new(0, 0, 40000, 3500),
            ..BulbConfig::default()
        };
        let bulb: BulbContext<4> = BulbContext::new(&config, at(0));
        let dispatcher = bulb.dispatcher();
        let mut scheduler = bulb.scheduler(RecordingDriver::default());

        dispatcher.handle(&set_power(POWER_OFF, 0), at(0)).unwrap();
        for hue in 1..=4 {
            dispatcher
                .handle(&set_color(Hsbk::new(hue, 0, 20000, 3500), 0), at(0))
                .unwrap();
        }

        scheduler.tick(at(0)).unwrap();
        // The power off was consumed before the colors that followed it
        assert_eq!(scheduler.engine().last_brightness(), 40000);
        assert_eq!(scheduler.engine().current(), Hsbk::new(4, 0, 20000, 3500));
    }

    #[test]
    fn test_same_color_twice_is_continuous() {
        let bulb: BulbContext = BulbContext::new(&BulbConfig::default(), at(0));
        let dispatcher = bulb.dispatcher();
        let mut scheduler = bulb.scheduler(RecordingDriver::default());
        let target = Hsbk::new(1000, 2000, 3000, 4000);

        dispatcher.handle(&set_color(target, 100), at(0)).unwrap();
        scheduler.tick(at(0)).unwrap();
        scheduler.tick(at(100)).unwrap();

        dispatcher.handle(&set_color(target, 100), at(120)).unwrap();
        scheduler.tick(at(120)).unwrap();
        let active = *scheduler.engine().active().unwrap();
        assert_eq!(active.source(), target);
        assert_eq!(active.target(), target);
        assert_eq!(scheduler.engine().current(), target);
    }

    #[test]
    fn test_scheduler_timing() {
        let bulb: BulbContext = BulbContext::new(&BulbConfig::default(), at(0));
        let mut scheduler = bulb.scheduler(RecordingDriver::default());

        let frame = scheduler.tick(at(0)).unwrap();
        assert_eq!(frame.next_deadline, at(20));
        assert_eq!(frame.sleep_duration, Duration::from_millis(20));

        let frame = scheduler.tick(at(25)).unwrap();
        assert_eq!(frame.next_deadline, at(40));
        assert_eq!(frame.sleep_duration, Duration::from_millis(15));

        // Stalled far behind: no catch-up burst
        let frame = scheduler.tick(at(500)).unwrap();
        assert_eq!(frame.next_deadline, at(520));
        assert_eq!(frame.sleep_duration, Duration::from_millis(20));
    }

    #[test]
    fn test_commands_from_another_thread() {
        let config = BulbConfig {
            power: POWER_ON,
            ..BulbConfig::default()
        };
        let bulb: BulbContext<64> = BulbContext::new(&config, at(0));
        let final_color = Hsbk::new(5000, 6000, 7000, 5000);

        std::thread::scope(|scope| {
            let dispatcher = bulb.dispatcher();
            scope.spawn(move || {
                for i in 0..32u16 {
                    let color = Hsbk::new(i * 100, i * 200, i * 300, 3500);
                    dispatcher.handle(&set_color(color, 10), at(0)).unwrap();
                }
                dispatcher.handle(&set_color(final_color, 10), at(0)).unwrap();
            });
        });

        let mut scheduler = bulb.scheduler(RecordingDriver::default());
        scheduler.tick(at(0)).unwrap();
        scheduler.tick(at(20)).unwrap();

        assert_eq!(bulb.store().get().color, final_color);
        assert_eq!(bulb.store().rendered(), final_color);
        assert!(bulb.actions().is_empty());
    }
}
