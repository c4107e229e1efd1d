mod tests {
    use duolight_engine::waveform::Shape;
    use duolight_engine::{Channel, OutputError, PwmOutput, SceneError, SceneTable};
    use embassy_time::Duration;

    const FREQUENCY: u32 = 64;
    const TICK: Duration = Duration::from_millis(15);

    #[derive(Default)]
    struct RecordingPwm {
        writes: Vec<(Channel, u32)>,
    }

    impl PwmOutput for RecordingPwm {
        fn write(
            &mut self,
            channel: Channel,
            _frequency_hz: u32,
            intensity: u32,
        ) -> Result<(), OutputError> {
            self.writes.push((channel, intensity));
            Ok(())
        }
    }

    /// Rejects every write on one channel, accepts the other.
    struct HalfBrokenPwm {
        broken: Channel,
        accepted: Vec<(Channel, u32)>,
    }

    impl PwmOutput for HalfBrokenPwm {
        fn write(
            &mut self,
            channel: Channel,
            _frequency_hz: u32,
            intensity: u32,
        ) -> Result<(), OutputError> {
            if channel == self.broken {
                return Err(OutputError);
            }
            self.accepted.push((channel, intensity));
            Ok(())
        }
    }

    #[test]
    fn standard_table_has_five_scenes_with_a_dark_base() {
        let table = SceneTable::standard();

        assert_eq!(table.len(), 5);
        assert_eq!(table.active(), None);

        let (a, b) = table.get(0).unwrap().players();
        assert_eq!(a.shape(), Shape::Off);
        assert_eq!(b.shape(), Shape::Off);
        assert_eq!(a.channel(), Channel::A);
        assert_eq!(b.channel(), Channel::B);

        let (a, b) = table.get(3).unwrap().players();
        assert_eq!(a.shape(), Shape::TripleFlash);
        assert_eq!(b.shape(), Shape::TripleFlash);
    }

    #[test]
    fn unknown_scene_is_rejected() {
        let mut table = SceneTable::standard();
        let mut pwm = RecordingPwm::default();

        let result = table.start_scene(9, &mut pwm, FREQUENCY);
        assert_eq!(result, Err(SceneError::UnknownScene(9)));
        assert_eq!(table.active(), None);
        assert!(pwm.writes.is_empty());
    }

    #[test]
    fn nothing_runs_until_a_scene_is_started() {
        let mut table = SceneTable::standard();
        let mut pwm = RecordingPwm::default();

        table.service(&mut pwm, FREQUENCY, TICK);
        assert!(pwm.writes.is_empty());
    }

    #[test]
    fn ticks_drive_both_channels_of_the_active_scene() {
        let mut table = SceneTable::standard();
        let mut pwm = RecordingPwm::default();

        // Scene 4 is the fast alternating square: channel A starts lit,
        // channel B starts half a period later.
        table.start_scene(4, &mut pwm, FREQUENCY).unwrap();
        assert!(pwm.writes.is_empty());

        table.service(&mut pwm, FREQUENCY, TICK);
        assert_eq!(pwm.writes, vec![(Channel::A, 1_000_000), (Channel::B, 0)]);
    }

    #[test]
    fn switching_scenes_zeroes_both_channels_first() {
        let mut table = SceneTable::standard();
        let mut pwm = RecordingPwm::default();

        table.start_scene(4, &mut pwm, FREQUENCY).unwrap();
        table.service(&mut pwm, FREQUENCY, TICK);

        table.start_scene(3, &mut pwm, FREQUENCY).unwrap();
        table.service(&mut pwm, FREQUENCY, TICK);

        // Pre-switch tick, two zero writes from the stop, then the new
        // scene's first tick. Never interleaved.
        assert_eq!(
            pwm.writes,
            vec![
                (Channel::A, 1_000_000),
                (Channel::B, 0),
                (Channel::A, 0),
                (Channel::B, 0),
                (Channel::A, 1_000_000),
                (Channel::B, 0),
            ]
        );
        assert_eq!(table.active(), Some(3));
    }

    #[test]
    fn stop_scene_without_an_active_scene_writes_nothing() {
        let mut table = SceneTable::standard();
        let mut pwm = RecordingPwm::default();

        table.stop_scene(&mut pwm, FREQUENCY);
        assert!(pwm.writes.is_empty());
        assert_eq!(table.active(), None);
    }

    #[test]
    fn stop_scene_zeroes_and_clears_the_active_scene() {
        let mut table = SceneTable::standard();
        let mut pwm = RecordingPwm::default();

        table.start_scene(1, &mut pwm, FREQUENCY).unwrap();
        table.stop_scene(&mut pwm, FREQUENCY);

        assert_eq!(pwm.writes, vec![(Channel::A, 0), (Channel::B, 0)]);
        assert_eq!(table.active(), None);
    }

    #[test]
    fn a_rejected_channel_does_not_starve_the_other() {
        let mut table = SceneTable::standard();
        let mut pwm = HalfBrokenPwm {
            broken: Channel::A,
            accepted: Vec::new(),
        };

        table.start_scene(4, &mut pwm, FREQUENCY).unwrap();
        table.service(&mut pwm, FREQUENCY, TICK);
        table.service(&mut pwm, FREQUENCY, TICK);

        // Channel B keeps flowing and the failures are counted.
        assert_eq!(pwm.accepted, vec![(Channel::B, 0), (Channel::B, 0)]);
        assert_eq!(table.write_failures(), 2);
    }

    #[test]
    fn stop_failures_are_counted_but_still_clear_the_scene() {
        let mut table = SceneTable::standard();
        let mut pwm = HalfBrokenPwm {
            broken: Channel::A,
            accepted: Vec::new(),
        };

        table.start_scene(1, &mut pwm, FREQUENCY).unwrap();
        table.stop_scene(&mut pwm, FREQUENCY);

        assert_eq!(table.active(), None);
        assert_eq!(table.write_failures(), 1);
        // Channel B still received its zero write.
        assert_eq!(pwm.accepted, vec![(Channel::B, 0)]);
    }
}
