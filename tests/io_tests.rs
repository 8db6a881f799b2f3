use ecgchallenge::io::{
    header_file, load_diagnoses, load_header, load_text, record_image_files, record_signal_files,
    save_diagnoses, save_text, to_format16,
};
use ecgchallenge::{header, ChallengeError};
use ndarray::array;
use std::path::PathBuf;
use tempfile::TempDir;

// 在临时目录中写入一个记录头文件，返回记录路径（无扩展名）
fn create_test_record(dir: &TempDir, name: &str, trailer: &str) -> PathBuf {
    let record = dir.path().join(name);
    let text = format!(
        "{name} 2 500 5000\n\
         {name}.dat 16 1000.0(0)/mV 16 0 12 0 0 I\n\
         {name}.dat 16 1000.0(0)/mV 16 0 -4 0 0 II\n\
         {trailer}"
    );
    save_text(header_file(&record), &text).unwrap();
    record
}

#[test]
fn test_load_header_from_record() {
    let dir = TempDir::new().unwrap();
    let record = create_test_record(&dir, "00007_hr", "#Dx: NORM\n#Image: 00007_hr-0.png, 00007_hr-1.png\n");

    let header = load_header(&record).unwrap();
    assert_eq!(header.record_name, "00007_hr");
    assert_eq!(header.channel_names(), vec!["I", "II"]);

    assert_eq!(record_signal_files(&record).unwrap(), vec!["00007_hr.dat"]);
    assert_eq!(
        record_image_files(&record).unwrap(),
        vec!["00007_hr-0.png", "00007_hr-1.png"]
    );

    // 显式带 .hea 的路径也可以
    assert_eq!(load_header(header_file(&record)).unwrap(), header);
}

#[test]
fn test_save_then_load_diagnoses() {
    let dir = TempDir::new().unwrap();
    let record = create_test_record(&dir, "00008_lr", "");

    assert!(matches!(load_diagnoses(&record), Err(ChallengeError::MissingDiagnosis)));

    save_diagnoses(&record, &["AFIB", "PAC"]).unwrap();
    assert_eq!(load_diagnoses(&record).unwrap(), vec!["AFIB", "PAC"]);

    save_diagnoses(&record, &["NORM"]).unwrap();
    assert_eq!(load_diagnoses(&record).unwrap(), vec!["AFIB", "PAC", "NORM"]);

    let text = load_text(header_file(&record)).unwrap();
    assert!(text.ends_with("#Dx: AFIB, PAC\n#Dx: NORM\n"));
    assert_eq!(header::get_variable(&text, "#Dx:").as_deref(), Some("NORM"));
}

#[test]
fn test_missing_record() {
    let dir = TempDir::new().unwrap();
    let record = dir.path().join("absent");
    assert!(matches!(load_header(&record), Err(ChallengeError::FileNotFound(_))));
    assert!(matches!(save_diagnoses(&record, &["NORM"]), Err(ChallengeError::FileNotFound(_))));
}

#[test]
fn test_format16_from_header_formats() {
    let dir = TempDir::new().unwrap();
    let record = create_test_record(&dir, "00009_lr", "#Dx: NORM\n");
    let header = load_header(&record).unwrap();

    let signal = array![[12.7, -4.2], [65535.0, -65535.0]];
    let samples = to_format16(signal.view(), &header.signal_formats()).unwrap();
    assert_eq!(samples, array![[12_i16, -4], [32767, -32767]]);
}

#[test]
fn test_format16_rejects_other_formats() {
    let signal = array![[0.0, 0.0]];
    match to_format16(signal.view(), &["212", "16"]) {
        Err(ChallengeError::UnsupportedFormat(formats)) => assert_eq!(formats, "16, 212"),
        other => panic!("expected UnsupportedFormat, got {:?}", other),
    }
}
