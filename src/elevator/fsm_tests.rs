/*
 * Unit tests for elevator module
 *
 * The unit tests follows the Arrange, Act, Assert pattern.
 *
 * Tests:
 * - test_elevator_new_initial_state
 * - test_elevator_add_trip_sets_direction
 * - test_elevator_go_up_and_down
 * - test_elevator_go_up_at_top_floor
 * - test_elevator_go_down_at_ground_floor
 * - test_elevator_set_current_floor_out_of_range
 * - test_elevator_doors_and_end
 * - test_elevator_remove_executed_trips
 * - test_elevator_check_current_floor
 * - test_elevator_add_people_from_longest_queue
 * - test_elevator_add_people_respects_capacity
 * - test_elevator_add_people_delivers_passengers
 * - test_elevator_set_capacity_limits_boarding
 * - test_elevator_recall_skips_assigned_call
 * - test_elevator_pause_wakes_parked_elevator
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod fsm_tests {
    use crate::building::Building;
    use crate::elevator::ElevatorSettings;
    use crate::people::Person;
    use crate::shared::{Direction, ElevatorState, SimError, Trip};
    use crossbeam_channel::unbounded;
    use std::thread::spawn;
    use std::time::Duration;

    fn setup_building(n_floors: usize, n_elevators: usize, capacity: u32) -> Building {
        let settings = ElevatorSettings {
            capacity,
            door_speed: Duration::ZERO,
            travel_speed: Duration::ZERO,
        };
        Building::with_settings(n_floors, n_elevators, "address", settings).unwrap()
    }

    #[test]
    fn test_elevator_new_initial_state() {
        // Purpose: A new elevator is idle on the ground floor and empty

        // Arrange
        let building = setup_building(5, 1, 400);

        // Act
        let snapshot = building.elevator(0).unwrap().snapshot();

        // Assert
        assert_eq!(snapshot.state, ElevatorState::Stop);
        assert_eq!(snapshot.direction, Direction::None);
        assert_eq!(snapshot.current_floor, 0);
        assert_eq!(snapshot.trips, 0);
        assert_eq!(snapshot.passengers, 0);
        assert_eq!(snapshot.free_capacity(), 400);
        assert!(snapshot.is_idle());
    }

    #[test]
    fn test_elevator_add_trip_sets_direction() {
        // Purpose: An idle elevator turns towards its first trip, later trips keep the direction

        // Arrange
        let building = setup_building(10, 1, 400);
        let elevator = building.elevator(0).unwrap();
        elevator.set_current_floor(4).unwrap();

        // Act
        elevator.add_trip(Trip::new(1, Direction::Up).unwrap());
        elevator.add_trip(Trip::new(8, Direction::Up).unwrap());

        // Assert
        assert_eq!(elevator.direction(), Direction::Down);
        assert_eq!(elevator.trips().len(), 2);
        assert!(!elevator.snapshot().is_idle());
    }

    #[test]
    fn test_elevator_go_up_and_down() {
        // Arrange
        let building = setup_building(4, 1, 400);
        let elevator = building.elevator(0).unwrap();

        // Act
        elevator.go_up().unwrap();
        elevator.go_up().unwrap();
        let up = elevator.snapshot();
        elevator.go_down().unwrap();
        let down = elevator.snapshot();

        // Assert
        assert_eq!(up.current_floor, 2);
        assert_eq!(up.direction, Direction::Up);
        assert_eq!(up.state, ElevatorState::Move);
        assert_eq!(down.current_floor, 1);
        assert_eq!(down.direction, Direction::Down);
        assert_eq!(building.metrics().floors_passed(), 3);
    }

    #[test]
    fn test_elevator_go_up_at_top_floor() {
        // Purpose: The car can never leave the shaft at the top

        // Arrange
        let building = setup_building(3, 1, 400);
        let elevator = building.elevator(0).unwrap();
        elevator.set_current_floor(2).unwrap();
        let before = elevator.snapshot();

        // Act
        let result = elevator.go_up();

        // Assert
        assert!(matches!(result, Err(SimError::FloorOutOfRange { .. })));
        assert_eq!(elevator.snapshot(), before);
        assert_eq!(building.metrics().floors_passed(), 0);
    }

    #[test]
    fn test_elevator_go_down_at_ground_floor() {
        // Arrange
        let building = setup_building(3, 1, 400);
        let elevator = building.elevator(0).unwrap();
        let before = elevator.snapshot();

        // Act
        let result = elevator.go_down();

        // Assert
        assert!(matches!(result, Err(SimError::FloorOutOfRange { .. })));
        assert_eq!(elevator.snapshot(), before);
    }

    #[test]
    fn test_elevator_set_current_floor_out_of_range() {
        // Arrange
        let building = setup_building(3, 1, 400);
        let elevator = building.elevator(0).unwrap();

        // Act
        let result = elevator.set_current_floor(3);

        // Assert
        assert!(result.is_err());
        assert_eq!(elevator.current_floor(), 0);
    }

    #[test]
    fn test_elevator_doors_and_end() {
        // Arrange
        let building = setup_building(3, 1, 400);
        let elevator = building.elevator(0).unwrap();

        // Act & Assert
        elevator.open_door();
        assert_eq!(elevator.state(), ElevatorState::OpenDoor);
        elevator.close_door();
        assert_eq!(elevator.state(), ElevatorState::CloseDoor);
        elevator.add_trip(Trip::new(2, Direction::Up).unwrap());
        elevator.end();
        assert_eq!(elevator.state(), ElevatorState::End);
        assert_eq!(elevator.direction(), Direction::None);
    }

    #[test]
    fn test_elevator_remove_executed_trips() {
        // Purpose: Every trip ending on the current floor is dropped, others are kept

        // Arrange
        let building = setup_building(6, 1, 400);
        let elevator = building.elevator(0).unwrap();
        elevator.add_trip(Trip::new(1, Direction::Up).unwrap());
        elevator.add_trip(Trip::new(4, Direction::Up).unwrap());
        elevator.add_trip(Trip::new(1, Direction::Down).unwrap());
        elevator.go_up().unwrap();

        // Act
        let removed = elevator.remove_executed_trips();
        let removed_again = elevator.remove_executed_trips();

        // Assert
        assert!(removed);
        assert!(!removed_again);
        assert_eq!(elevator.trips(), vec![Trip::new(4, Direction::Up).unwrap()]);
    }

    #[test]
    fn test_elevator_check_current_floor() {
        // Purpose: A car moving up stops for an up waiter on the way but not for a down waiter

        // Arrange
        let building = setup_building(10, 1, 400);
        let elevator = building.elevator(0).unwrap();
        elevator.set_current_floor(2).unwrap();
        elevator.add_trip(Trip::new(7, Direction::Up).unwrap());
        building
            .floor(3)
            .unwrap()
            .add_person(Person::new(1, 70, 3, 0).unwrap())
            .unwrap();

        // Act
        let on_floor_2_before = elevator.check_current_floor();
        building
            .floor(2)
            .unwrap()
            .add_person(Person::new(2, 70, 2, 5).unwrap())
            .unwrap();
        let on_floor_2_after = elevator.check_current_floor();
        elevator.go_up().unwrap();
        let on_floor_3 = elevator.check_current_floor();

        // Assert
        assert!(!on_floor_2_before);
        assert!(on_floor_2_after);
        assert!(!on_floor_3);
    }

    #[test]
    fn test_elevator_add_people_from_longest_queue() {
        // Purpose: An idle car boards from the longer queue and takes that direction

        // Arrange
        let building = setup_building(10, 1, 400);
        let elevator = building.elevator(0).unwrap();
        elevator.set_current_floor(4).unwrap();
        let floor = building.floor(4).unwrap();
        floor.add_person(Person::new(1, 60, 4, 8).unwrap()).unwrap();
        floor.add_person(Person::new(2, 60, 4, 1).unwrap()).unwrap();
        floor.add_person(Person::new(3, 60, 4, 0).unwrap()).unwrap();

        // Act
        elevator.add_people();

        // Assert
        assert_eq!(elevator.direction(), Direction::Down);
        let ids: Vec<u64> = elevator.passengers().iter().map(Person::id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(floor.number_of_people(Direction::Up), 1);
        assert_eq!(floor.number_of_people(Direction::Down), 0);
        assert!(building
            .controller()
            .all_trips()
            .contains(&Trip::new(4, Direction::Up).unwrap()));
    }

    #[test]
    fn test_elevator_add_people_respects_capacity() {
        // Purpose: A waiter who does not fit stays queued and gets a fresh hall call

        // Arrange
        let building = setup_building(10, 1, 100);
        let elevator = building.elevator(0).unwrap();
        let floor = building.floor(1).unwrap();
        floor.add_person(Person::new(1, 50, 1, 5).unwrap()).unwrap();
        floor.add_person(Person::new(2, 60, 1, 5).unwrap()).unwrap();
        elevator.go_up().unwrap();

        // Act
        elevator.add_people();

        // Assert
        let passengers = elevator.passengers();
        assert_eq!(passengers.len(), 1);
        assert_eq!(passengers[0].weight(), 50);
        assert_eq!(elevator.free_capacity(), 50);
        assert_eq!(elevator.trips(), vec![Trip::new(5, Direction::Up).unwrap()]);
        assert_eq!(floor.first_person(Direction::Up).map(|p| p.weight()), Some(60));
        assert_eq!(
            building.controller().all_trips(),
            vec![Trip::new(1, Direction::Up).unwrap()]
        );
    }

    #[test]
    fn test_elevator_add_people_delivers_passengers() {
        // Arrange
        let building = setup_building(4, 1, 400);
        let elevator = building.elevator(0).unwrap();
        building
            .floor(0)
            .unwrap()
            .add_person(Person::new(1, 80, 0, 2).unwrap())
            .unwrap();
        elevator.add_people();

        // Act
        elevator.go_up().unwrap();
        elevator.go_up().unwrap();
        elevator.remove_executed_trips();
        elevator.add_people();

        // Assert
        let snapshot = elevator.snapshot();
        assert_eq!(snapshot.passengers, 0);
        assert_eq!(snapshot.delivered, 1);
        assert_eq!(snapshot.direction, Direction::None);
        assert_eq!(building.metrics().delivered(), 1);
    }

    #[test]
    fn test_elevator_set_capacity_limits_boarding() {
        // Purpose: Settings changed before start apply to movement and boarding

        // Arrange
        let building = Building::new(5, 1, "address").unwrap();
        let elevator = building.elevator(0).unwrap();
        elevator.set_capacity(100);
        elevator.set_door_speed(Duration::ZERO);
        elevator.set_travel_speed(Duration::ZERO);
        let floor = building.floor(0).unwrap();
        floor.add_person(Person::new(1, 70, 0, 3).unwrap()).unwrap();
        floor.add_person(Person::new(2, 70, 0, 4).unwrap()).unwrap();

        // Act
        elevator.add_people();

        // Assert
        let settings = elevator.settings();
        assert_eq!(settings.capacity, 100);
        assert_eq!(settings.travel_speed, Duration::ZERO);
        assert_eq!(elevator.passengers().len(), 1);
        assert_eq!(elevator.free_capacity(), 30);
        assert_eq!(floor.number_of_people(Direction::Up), 1);
    }

    #[test]
    fn test_elevator_recall_skips_assigned_call() {
        // Purpose: A waiter whose hall call is already assigned gets no second call

        // Arrange
        let building = setup_building(10, 2, 400);
        let controller = building.controller();
        let floor = building.floor(5).unwrap();
        floor.add_person(Person::new(1, 70, 5, 8).unwrap()).unwrap();
        assert_eq!(controller.send_trip(), Some(0));
        let elevator = building.elevator(1).unwrap();
        elevator.set_current_floor(5).unwrap();
        floor.add_person(Person::new(2, 70, 5, 1).unwrap()).unwrap();

        // Act
        elevator.add_people();

        // Assert
        assert_eq!(elevator.direction(), Direction::Down);
        assert_eq!(elevator.passengers().len(), 1);
        assert_eq!(
            building.elevator(0).unwrap().trips(),
            vec![Trip::new(5, Direction::Up).unwrap()]
        );
        assert!(controller.all_trips().is_empty());
    }

    #[test]
    fn test_elevator_pause_wakes_parked_elevator() {
        // Purpose: A parked elevator leaves its loop and ends once paused

        // Arrange
        let building = setup_building(3, 1, 400);
        let elevator = building.elevator(0).unwrap().clone();
        let (done_tx, done_rx) = unbounded::<()>();
        elevator.unpause();
        let worker = elevator.clone();

        // Act
        let handle = spawn(move || {
            worker.run();
            done_tx.send(()).unwrap();
        });
        std::thread::sleep(Duration::from_millis(50));
        elevator.pause();

        // Assert
        match done_rx.recv_timeout(Duration::from_secs(3)) {
            Ok(()) => {}
            Err(e) => panic!("elevator did not stop: {:?}", e),
        }
        handle.join().unwrap();
        assert_eq!(elevator.state(), ElevatorState::End);
        assert!(!elevator.is_moving());
    }
}
